/*
 * Responsibility
 * - login / self-service request and response DTOs
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::types::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err("username and password are required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginWithTotpRequest {
    #[serde(flatten)]
    pub login: LoginRequest,
    pub totp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.new_password.chars().count() < 6 {
            return Err("new password must be at least 6 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmTotpRequest {
    pub totp: String,
}

#[derive(Debug, Serialize)]
pub struct TotpSecretResponse {
    pub secret: String,
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    #[serde(flatten)]
    pub user: User,
    pub enable_totp: bool,
}
