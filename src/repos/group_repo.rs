/*
 * Responsibility
 * - user groups (name + member user ids)
 */
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::repos::error::RepoError;

const RESOURCE: &str = "user group";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct GroupRepo {
    rows: RwLock<HashMap<String, UserGroup>>,
}

impl GroupRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, name: &str, members: Vec<String>) -> Result<UserGroup, RepoError> {
        let mut rows = self.rows.write();
        if rows.values().any(|g| g.name == name) {
            return Err(RepoError::Conflict(format!("group {name} already exists")));
        }

        let group = UserGroup {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            members: dedup(members),
            created: Utc::now(),
        };
        rows.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    pub fn get(&self, id: &str) -> Option<UserGroup> {
        self.rows.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<UserGroup> {
        let mut groups: Vec<UserGroup> = self.rows.read().values().cloned().collect();
        groups.sort_by(|a, b| b.created.cmp(&a.created));
        groups
    }

    pub fn update(
        &self,
        id: &str,
        name: Option<&str>,
        members: Option<Vec<String>>,
    ) -> Result<UserGroup, RepoError> {
        let mut rows = self.rows.write();
        let group = rows.get_mut(id).ok_or(RepoError::NotFound(RESOURCE))?;
        if let Some(name) = name {
            group.name = name.to_string();
        }
        if let Some(members) = members {
            group.members = dedup(members);
        }
        Ok(group.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.rows.write().remove(id).is_some()
    }

    /// Drop `user_id` from every group it belongs to.
    pub fn remove_member(&self, user_id: &str) {
        for group in self.rows.write().values_mut() {
            group.members.retain(|m| m != user_id);
        }
    }
}

fn dedup(mut members: Vec<String>) -> Vec<String> {
    members.sort();
    members.dedup();
    members
}
