//! Shared fixtures for integration tests.
#![allow(dead_code)]

pub mod gated;

use cardio_client::{ClassifierApp, ClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const TOKEN: &str = "test-token";

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

/// Test fixture that manages a mockito server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Application pointed at the mock server, signed out.
    pub fn app(&self) -> ClassifierApp {
        ClientBuilder::new()
            .base_url(&self.base_url)
            .timeout_secs(5)
            .build()
            .expect("Failed to build app")
    }

    /// Application with [`TOKEN`] already installed.
    pub fn signed_in_app(&self) -> ClassifierApp {
        let app = self.app();
        app.session().set_credential(Some(TOKEN.to_string()));
        app
    }

    /// Create a mock for a JSON response that must carry the test credential
    pub async fn mock_protected(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", bearer().as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for a JSON response on a public endpoint
    pub async fn mock_public(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", Matcher::Missing)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// `GET /variants` returning `body`, expected exactly `hits` times.
    pub async fn mock_variant_list(&mut self, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", "/variants")
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }
}
