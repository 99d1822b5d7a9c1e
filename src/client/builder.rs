use crate::app::ClassifierApp;
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::Result;
use std::path::Path;

/// Builder for the API client and the application state around it.
///
/// Keep this surface area small and predictable.
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Start from a fully specified configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Start from a YAML configuration file.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_config(ClientConfig::from_path(path)?))
    }

    /// Set the API root, e.g. `https://classifier.example.org/api`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Per-request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Reference assembly to send with every classification.
    pub fn genome_build(mut self, build: impl Into<String>) -> Self {
        self.config.genome_build = Some(build.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build only the typed endpoint client.
    pub fn build_api(self) -> Result<ApiClient> {
        ApiClient::new(&self.config)
    }

    /// Build the full application state.
    pub fn build(self) -> Result<ClassifierApp> {
        Ok(ClassifierApp::new(self.build_api()?))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
