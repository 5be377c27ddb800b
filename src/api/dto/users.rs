/*
 * Responsibility
 * - Users の request DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::Deserialize;

use crate::services::auth::types::UserType;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub nickname: Option<String>,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.username.len() > 64 {
            return Err("username must be <= 64 chars");
        }
        if self.password.chars().count() < 6 {
            return Err("password must be at least 6 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub nickname: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(nickname) = &self.nickname
            && nickname.trim().is_empty()
        {
            return Err("nickname cannot be empty");
        }
        Ok(())
    }
}
