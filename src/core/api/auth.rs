//! Authentication endpoints.

use reqwest::Method;

use super::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use super::Client;
use crate::core::config::Session;
use crate::error::Result;

impl AuthResponse {
    /// Session to persist after a successful register or login.
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            user_id: self.user.id,
            email: self.user.email,
            expires_at: self.expires_at,
        }
    }
}

impl Client {
    /// Create an account, registering `age_public_key` as its recipient key.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        age_public_key: &str,
    ) -> Result<AuthResponse> {
        let body = RegisterRequest {
            email,
            password,
            name,
            age_public_key,
        };
        self.request(Method::POST, "auth/register-enhanced", &[], Some(&body))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest { email, password };
        self.request(Method::POST, "auth/login", &[], Some(&body))
    }

    /// Invalidate the current token server-side.
    pub fn logout(&self) -> Result<()> {
        self.request_empty::<()>(Method::POST, "auth/logout", None)
    }

    /// The user the current token belongs to.
    pub fn me(&self) -> Result<User> {
        let response: AuthResponse = self.request::<(), _>(Method::GET, "auth/me", &[], None)?;
        Ok(response.user)
    }
}
