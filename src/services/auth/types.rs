/*
 * Responsibility
 * - Identity types shared by the cache, the authorization decision and handlers
 * - User is read-only here; the user repository owns its lifecycle
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a user account.
///
/// Matching on this is exhaustive on purpose: a new role must be handled by
/// every decision that looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    Standard,
}

impl UserType {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub nickname: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created: DateTime<Utc>,
}

/// Binding of one active token to one user, stored in the identity cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub token: String,
    pub remember: bool,
    pub user: User,
}
