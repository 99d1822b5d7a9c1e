use crate::config::ClientConfig;
use crate::error::{ApiErrorBody, Error};
use crate::transport::TransportError;
use crate::Result;
use arc_swap::ArcSwapOption;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Whether a call needs the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Login, registration, health. Never carries `Authorization`.
    Public,
    /// Refused locally, without touching the network, when no credential is installed.
    Protected,
}

/// A settled HTTP exchange: status plus raw body.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn error_body(&self) -> ApiErrorBody {
        ApiErrorBody::from_slice(&self.body)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode a protected endpoint's reply, mapping non-2xx onto the error taxonomy.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if self.is_success() {
            self.decode()
        } else {
            Err(Error::from_status(self.status, &self.error_body()))
        }
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credential: ArcSwapOption<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential: ArcSwapOption::empty(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or clear the bearer credential. Takes effect for every request
    /// constructed after this call returns.
    pub fn set_credential(&self, token: Option<String>) {
        self.credential.store(token.map(Arc::new));
    }

    pub fn credential(&self) -> Option<Arc<String>> {
        self.credential.load_full()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.load().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and collect the reply.
    ///
    /// The credential is read once, atomically, while the request is built.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        access: Access,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<Reply> {
        let token = match access {
            Access::Public => None,
            Access::Protected => match self.credential.load_full() {
                Some(token) => Some(token),
                None => {
                    debug!(%method, path, "refusing protected call without a credential");
                    return Err(Error::unauthorized("No active session"));
                }
            },
        };

        let request_id = Uuid::new_v4().to_string();
        let mut req = self
            .client
            .request(method.clone(), self.url(path))
            .header(ACCEPT, "application/json")
            .header("x-request-id", request_id.as_str());
        if let Some(token) = &token {
            req = req.bearer_auth(token.as_str());
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!(
            %method,
            path,
            request_id = request_id.as_str(),
            authorized = token.is_some(),
            "dispatching request"
        );

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?
            .to_vec();

        debug!(path, request_id = request_id.as_str(), status, "request settled");
        Ok(Reply { status, body })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute::<()>(Method::GET, path, Access::Protected, None, query)
            .await?
            .into_result()
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, path, Access::Protected, Some(body), &[])
            .await?
            .into_result()
    }
}
