//! A minimal HTTP/1.1 responder whose replies can be held back.
//!
//! mockito answers immediately, which makes "the older response arrives
//! last" impossible to stage. Routes here may wait on a [`Notify`] before
//! replying.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

#[derive(Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    /// Match only requests whose body contains this text.
    pub body_contains: Option<&'static str>,
    pub status: u16,
    pub body: &'static str,
    pub gate: Option<Arc<Notify>>,
    /// Requests matched so far, counted on arrival.
    pub hits: Arc<AtomicUsize>,
}

impl Route {
    pub fn new(method: &'static str, path: &'static str, body: &'static str) -> Self {
        Self {
            method,
            path,
            body_contains: None,
            status: 200,
            body,
            gate: None,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Shared handle to this route's hit counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.hits.clone()
    }

    pub fn when_body_contains(mut self, needle: &'static str) -> Self {
        self.body_contains = Some(needle);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

pub struct GatedServer {
    pub base_url: String,
}

impl GatedServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let routes = Arc::new(routes);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, &routes).await;
                });
            }
        });
        Self {
            base_url: format!("http://{}", addr),
        }
    }
}

async fn serve(mut stream: TcpStream, routes: &[Route]) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default();
    let target = request_line.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default();

    let route = routes.iter().find(|r| {
        r.method == method
            && r.path == path
            && r.body_contains.map_or(true, |needle| body.contains(needle))
    });

    let (status, payload) = match route {
        Some(route) => {
            route.hits.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &route.gate {
                gate.notified().await;
            }
            (route.status, route.body)
        }
        None => (404, r#"{"detail":"Not Found"}"#),
    };

    let response = format!(
        "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
