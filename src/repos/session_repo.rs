/*
 * Responsibility
 * - terminal session bookkeeping (status, window size, timestamps)
 * - the transport itself is not part of this service
 */
use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::repos::error::RepoError;

const RESOURCE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub asset_id: String,
    pub owner: String,
    pub status: SessionStatus,
    pub width: u32,
    pub height: u32,
    pub created: DateTime<Utc>,
    pub connected_time: Option<DateTime<Utc>>,
    pub disconnected_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct SessionRepo {
    rows: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, owner: &str, asset_id: &str, width: u32, height: u32) -> SessionRecord {
        let session = SessionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            owner: owner.to_string(),
            status: SessionStatus::Connecting,
            width,
            height,
            created: Utc::now(),
            connected_time: None,
            disconnected_time: None,
        };
        self.insert(session.clone());
        session
    }

    pub fn insert(&self, session: SessionRecord) {
        self.rows.write().insert(session.id.clone(), session);
    }

    pub fn get(&self, id: &str) -> Option<SessionRecord> {
        self.rows.read().get(id).cloned()
    }

    pub fn owner_of(&self, id: &str) -> Result<String, RepoError> {
        self.rows
            .read()
            .get(id)
            .map(|s| s.owner.clone())
            .ok_or(RepoError::NotFound(RESOURCE))
    }

    pub fn list_where(&self, visible: impl Fn(&SessionRecord) -> bool) -> Vec<SessionRecord> {
        let mut sessions: Vec<SessionRecord> = self
            .rows
            .read()
            .values()
            .filter(|s| visible(s))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created.cmp(&a.created));
        sessions
    }

    /// Move to `status`, stamping connect/disconnect times.
    pub fn set_status(&self, id: &str, status: SessionStatus) -> Result<SessionRecord, RepoError> {
        let mut rows = self.rows.write();
        let session = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;

        let now = Utc::now();
        match status {
            SessionStatus::Connecting => {}
            SessionStatus::Connected => session.connected_time = Some(now),
            SessionStatus::Disconnected => session.disconnected_time = Some(now),
        }
        session.status = status;

        Ok(session.clone())
    }

    pub fn resize(&self, id: &str, width: u32, height: u32) -> Result<SessionRecord, RepoError> {
        let mut rows = self.rows.write();
        let session = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;
        session.width = width;
        session.height = height;
        Ok(session.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.rows.write().remove(id).is_some()
    }

    pub fn count_online(&self, visible: impl Fn(&SessionRecord) -> bool) -> usize {
        self.rows
            .read()
            .values()
            .filter(|s| s.status == SessionStatus::Connected && visible(s))
            .count()
    }

    /// Sessions created per day over the `days` days ending at `today`, oldest first.
    pub fn created_per_day(
        &self,
        today: NaiveDate,
        days: i64,
        visible: impl Fn(&SessionRecord) -> bool,
    ) -> Vec<(NaiveDate, usize)> {
        let rows = self.rows.read();
        (0..days)
            .rev()
            .map(|back| {
                let day = today - Duration::days(back);
                let count = rows
                    .values()
                    .filter(|s| s.created.date_naive() == day && visible(s))
                    .count();
                (day, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions_stamp_times() {
        let repo = SessionRepo::new();
        let session = repo.create("u1", "a1", 80, 24);
        assert_eq!(session.status, SessionStatus::Connecting);

        let connected = repo.set_status(&session.id, SessionStatus::Connected).unwrap();
        assert!(connected.connected_time.is_some());
        assert_eq!(repo.count_online(|_| true), 1);

        let closed = repo.set_status(&session.id, SessionStatus::Disconnected).unwrap();
        assert!(closed.disconnected_time.is_some());
        assert_eq!(repo.count_online(|_| true), 0);
    }

    #[test]
    fn per_day_counts_cover_the_window() {
        let repo = SessionRepo::new();
        repo.create("u1", "a1", 80, 24);
        repo.create("u2", "a1", 80, 24);

        let today = Utc::now().date_naive();
        let counts = repo.created_per_day(today, 7, |s| s.owner == "u1");
        assert_eq!(counts.len(), 7);
        assert_eq!(counts.last(), Some(&(today, 1)));
        assert_eq!(counts.first().map(|(_, n)| *n), Some(0));
    }
}
