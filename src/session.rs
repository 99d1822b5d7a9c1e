//! Session credential management.
//!
//! The credential lives in the shared transport. Installing it makes every
//! later protected call carry `Authorization: Bearer <token>`; clearing it
//! removes the header from every call built afterwards.

use crate::client::ApiClient;
use crate::types::{AuthSession, Credentials};
use crate::Result;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Install (`Some`) or remove (`None`) the bearer credential.
    pub fn set_credential(&self, token: Option<String>) {
        match &token {
            Some(_) => info!("session credential installed"),
            None => info!("session credential cleared"),
        }
        self.api.transport().set_credential(token);
    }

    pub fn session(&self) -> AuthSession {
        AuthSession {
            token: self.api.transport().credential().map(|t| t.as_str().to_string()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.transport().has_credential()
    }

    /// Exchange credentials for a session. The caller installs the returned
    /// token with [`SessionManager::set_credential`]. Failures are not retried.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let creds = Credentials::new(email, password);
        match self.api.login(&creds).await {
            Ok(token) => Ok(token.into()),
            Err(e) => {
                warn!(email, error = %e, "login rejected");
                Err(e)
            }
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession> {
        let creds = Credentials::new(email, password);
        match self.api.register(&creds).await {
            Ok(token) => Ok(token.into()),
            Err(e) => {
                warn!(email, error = %e, "registration rejected");
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        self.set_credential(None);
    }
}
