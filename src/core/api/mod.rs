//! Remote service client.
//!
//! Blocking JSON-over-HTTPS client for the envv service. One attempt per
//! call with a fixed deadline from [`Settings`]; nothing is retried.
//!
//! Status mapping:
//!
//! | status | error                   |
//! |--------|-------------------------|
//! | 401    | `ApiError::Unauthorized` |
//! | 403    | `ApiError::Forbidden`    |
//! | 404    | `ApiError::NotFound`     |
//! | other  | `ApiError::Service`      |

use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::config::{Session, Settings};
use crate::error::{ApiError, Result};

mod auth;
mod organizations;
mod projects;
mod secrets;
pub mod types;

pub use types::{AuthResponse, Organization, OrganizationMember, Project, ProjectMember, User};

/// Authenticated (or anonymous) handle on the remote service.
pub struct Client {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl Client {
    /// Client without credentials, for register and login.
    pub fn anonymous(settings: &Settings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("envv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Client sending the session's bearer token.
    pub fn authenticated(settings: &Settings, session: &Session) -> Result<Self> {
        let mut client = Self::anonymous(settings)?;
        client.token = Some(session.access_token.clone());
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and decode a JSON success body.
    pub(crate) fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(method, path, query, body)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", path, e)).into())
    }

    /// Send a request whose success body is ignored.
    pub(crate) fn request_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, &[], body).map(|_| ())
    }

    fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, path, "api request");
        let mut builder = self.builder(method.clone(), path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(payload) = body {
            builder = builder.json(payload);
        }

        let response = builder
            .send()
            .map_err(|e| ApiError::Transport(format!("{} {}: {}", method, path, e)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ApiError::Transport(format!("failed to read response: {}", e)))?;
        trace!(%status, body_len = text.len(), "api response");

        if status.is_success() {
            Ok(text)
        } else {
            Err(error_for_status(status, &text).into())
        }
    }
}

/// Classify a non-2xx response using the service's error envelope.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let envelope: types::ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = if envelope.error.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_lowercase()
    } else {
        envelope.error
    };

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        other => ApiError::Service {
            status: other.as_u16(),
            code: if envelope.code.is_empty() {
                "unknown".to_string()
            } else {
                envelope.code
            },
            message,
        },
    }
}
