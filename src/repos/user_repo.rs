/*
 * Responsibility
 * - user accounts (identity + password hash + totp state)
 * - username is unique
 */
use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::repos::error::RepoError;
use crate::services::auth::types::{User, UserType};

const RESOURCE: &str = "user";

#[derive(Debug, Clone)]
pub struct UserRow {
    pub user: User,
    pub password_hash: String,
    pub totp_secret: Option<String>,
    // Issued by reset-totp, becomes `totp_secret` once a code is confirmed
    pub pending_totp_secret: Option<String>,
}

#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub nickname: &'a str,
    pub password_hash: String,
    pub user_type: UserType,
}

#[derive(Debug, Default)]
pub struct UserRepo {
    rows: RwLock<HashMap<String, UserRow>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, new: NewUser<'_>) -> Result<User, RepoError> {
        let mut rows = self.rows.write();
        if rows.values().any(|r| r.user.username == new.username) {
            return Err(RepoError::Conflict(format!(
                "username {} already exists",
                new.username
            )));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: new.username.to_string(),
            nickname: new.nickname.to_string(),
            user_type: new.user_type,
            created: Utc::now(),
        };
        rows.insert(
            user.id.clone(),
            UserRow {
                user: user.clone(),
                password_hash: new.password_hash,
                totp_secret: None,
                pending_totp_secret: None,
            },
        );

        Ok(user)
    }

    #[cfg(test)]
    pub fn insert(&self, user: User) {
        self.rows.write().insert(
            user.id.clone(),
            UserRow {
                user,
                password_hash: String::new(),
                totp_secret: None,
                pending_totp_secret: None,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.rows.read().get(id).map(|r| r.user.clone())
    }

    pub fn row(&self, id: &str) -> Option<UserRow> {
        self.rows.read().get(id).cloned()
    }

    pub fn find_by_username(&self, username: &str) -> Option<UserRow> {
        self.rows
            .read()
            .values()
            .find(|r| r.user.username == username)
            .cloned()
    }

    /// Newest first.
    pub fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.rows.read().values().map(|r| r.user.clone()).collect();
        users.sort_by(|a, b| b.created.cmp(&a.created));
        users
    }

    pub fn count(&self) -> usize {
        self.rows.read().len()
    }

    pub fn update(
        &self,
        id: &str,
        nickname: Option<&str>,
        user_type: Option<UserType>,
    ) -> Result<User, RepoError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;

        if let Some(nickname) = nickname {
            row.user.nickname = nickname.to_string();
        }
        if let Some(user_type) = user_type {
            row.user.user_type = user_type;
        }

        Ok(row.user.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.rows.write().remove(id).is_some()
    }

    pub fn set_password_hash(&self, id: &str, hash: String) -> Result<(), RepoError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;
        row.password_hash = hash;
        Ok(())
    }

    pub fn set_pending_totp(&self, id: &str, secret: String) -> Result<(), RepoError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;
        row.pending_totp_secret = Some(secret);
        Ok(())
    }

    /// Promote the pending secret. Returns `false` if none was pending.
    pub fn activate_pending_totp(&self, id: &str) -> Result<bool, RepoError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;
        match row.pending_totp_secret.take() {
            Some(secret) => {
                row.totp_secret = Some(secret);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
