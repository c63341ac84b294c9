use serde::{Deserialize, Serialize};

use super::Ack;
use crate::http::{ApiError, ServiceClient};

/// bcrypt ignores anything past 72 bytes; the backend rejects it outright.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenOut {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Me {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
    pub is_verified: bool,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Invalid("Password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::Invalid(
            "Password too long (bcrypt limit is 72 bytes).".to_string(),
        ));
    }
    Ok(())
}

pub struct AuthApi<'a> {
    client: &'a ServiceClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ServiceClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Ack, ApiError> {
        validate_password(password)?;
        self.client
            .post_json("/auth/register", &Credentials { email, password })
            .await
    }

    /// Confirms an email address with the token from the verification link.
    pub async fn verify(&self, token: &str) -> Result<Ack, ApiError> {
        self.client
            .get_json_with_query("/auth/verify", &[("token", token)])
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenOut, ApiError> {
        validate_password(password)?;
        self.client
            .post_json("/auth/login", &Credentials { email, password })
            .await
    }

    pub async fn me(&self) -> Result<Me, ApiError> {
        self.client.get_json("/auth/me").await
    }
}
