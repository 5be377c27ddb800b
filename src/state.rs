/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthService (identity cache behind it), repos, reject code
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{
    group_repo::GroupRepo, property_repo::PropertyRepo, record_repo::RecordRepo,
    session_repo::SessionRepo, share_repo::ShareRepo, user_repo::UserRepo,
};
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    /// Envelope code for requests rejected by the authentication gate.
    pub reject_code: i32,

    pub users: Arc<UserRepo>,
    pub groups: Arc<GroupRepo>,
    pub assets: Arc<RecordRepo>,
    pub credentials: Arc<RecordRepo>,
    pub commands: Arc<RecordRepo>,
    pub shares: Arc<ShareRepo>,
    pub sessions: Arc<SessionRepo>,
    pub properties: Arc<PropertyRepo>,
}

impl AppState {
    /// `users` must be the repository `auth` resolves accounts against.
    pub fn new(auth: Arc<AuthService>, users: Arc<UserRepo>, reject_code: i32) -> Self {
        Self {
            auth,
            reject_code,
            users,
            groups: Arc::new(GroupRepo::new()),
            assets: Arc::new(RecordRepo::new("asset")),
            credentials: Arc::new(RecordRepo::new("credential")),
            commands: Arc::new(RecordRepo::new("command")),
            shares: Arc::new(ShareRepo::new()),
            sessions: Arc::new(SessionRepo::new()),
            properties: Arc::new(PropertyRepo::new()),
        }
    }
}
