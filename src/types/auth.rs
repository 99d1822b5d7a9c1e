//! Credential exchange types for `/auth/login` and `/auth/register`.

use serde::{Deserialize, Serialize};

/// Body for both login and registration.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// The process-wide session credential. `token == None` means signed out.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub token: Option<String>,
}

impl AuthSession {
    pub fn signed_out() -> Self {
        Self { token: None }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }
}

impl From<TokenResponse> for AuthSession {
    fn from(resp: TokenResponse) -> Self {
        Self {
            token: Some(resp.access_token),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
