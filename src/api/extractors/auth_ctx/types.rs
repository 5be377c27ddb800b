/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - the gate resolves the identity and stores this in request extensions;
 *   handlers only ever see this type
 */
use crate::error::AppError;
use crate::services::auth::{permits, types::User};

/// Context attached to every request that passed the authentication gate.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub token: String,
    pub user: User,
}

impl AuthCtx {
    pub fn new(token: String, user: User) -> Self {
        Self { token, user }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.user_type.is_admin()
    }

    /// Ownership verdict for a resource owned by `owner`.
    pub fn has_permission(&self, owner: &str) -> bool {
        permits(&self.user, owner)
    }

    pub fn require_owner(&self, owner: &str) -> Result<(), AppError> {
        if self.has_permission(owner) {
            Ok(())
        } else {
            tracing::info!(user_id = %self.user.id, owner, "ownership check refused");
            Err(AppError::Forbidden)
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
