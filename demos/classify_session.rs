//! Sign in, classify one variant, run a small batch, and print the history
//! of the first stored variant.
//!
//! Usage: cargo run --example classify_session -- <config.yaml> <email> <password>
//!
//! Set RUST_LOG=cardio_client=debug to watch requests and fencing decisions.

use cardio_client::{BatchItemResult, ClientBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [config, email, password] = args.as_slice() else {
        anyhow::bail!("usage: classify_session <config.yaml> <email> <password>");
    };

    let app = ClientBuilder::from_config_path(config)?.build()?;
    app.login(email, password).await?;

    match app.classify("NM_000000.0:c.123A>T").await {
        Ok(settled) => {
            if let Some(result) = settled.applied() {
                println!("classification: {}", result.classification);
                for (key, rule) in result.keyed_rules() {
                    println!("  [{}] {} ({})", key, rule.code, rule.strength);
                }
                println!("  {}", result.rationale);
            }
        }
        Err(e) => println!("classification failed: {}", e.user_message()),
    }

    let batch = "NM_000000.0:c.123A>T\n\nNM_000000.0:c.456G>C\n";
    for item in app.run_batch(batch).await {
        match item {
            BatchItemResult::Classified { descriptor, result } => {
                println!("{} -> {}", descriptor, result.classification)
            }
            BatchItemResult::Failed(err) => println!(
                "{} failed: {}",
                err.descriptor.map(|d| d.to_string()).unwrap_or_else(|| "batch".into()),
                err.message
            ),
        }
    }

    let variants = app.snapshot().variants;
    println!("{} stored variants", variants.len());
    if let Some(first) = variants.first() {
        if let Some(events) = app.select_variant(first.id).await.applied() {
            for event in events {
                println!("  {} {} ({} rules)", event.created_at, event.classification, event.evidence.len());
            }
        }
    }

    app.logout();
    Ok(())
}
