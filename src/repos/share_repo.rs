/*
 * Responsibility
 * - resource sharing: which users (besides the owner) may see a resource
 * - listing visibility only; ownership checks do not consult this
 */
use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct ShareRepo {
    // resource id -> user ids
    shares: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl ShareRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users_of(&self, resource_id: &str) -> Vec<String> {
        self.shares
            .read()
            .get(resource_id)
            .map(|users| users.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_shared_with(&self, resource_id: &str, user_id: &str) -> bool {
        self.shares
            .read()
            .get(resource_id)
            .is_some_and(|users| users.contains(user_id))
    }

    /// Replace the full user set of one resource.
    pub fn overwrite(&self, resource_id: &str, user_ids: Vec<String>) {
        let users: BTreeSet<String> = user_ids.into_iter().collect();
        let mut shares = self.shares.write();
        if users.is_empty() {
            shares.remove(resource_id);
        } else {
            shares.insert(resource_id.to_string(), users);
        }
    }

    pub fn add(&self, user_id: &str, resource_ids: &[String]) {
        let mut shares = self.shares.write();
        for id in resource_ids {
            shares
                .entry(id.clone())
                .or_default()
                .insert(user_id.to_string());
        }
    }

    pub fn remove(&self, user_id: &str, resource_ids: &[String]) {
        let mut shares = self.shares.write();
        for id in resource_ids {
            if let Some(users) = shares.get_mut(id) {
                users.remove(user_id);
                if users.is_empty() {
                    shares.remove(id);
                }
            }
        }
    }

    pub fn forget_resource(&self, resource_id: &str) {
        self.shares.write().remove(resource_id);
    }

    pub fn forget_user(&self, user_id: &str) {
        let mut shares = self.shares.write();
        shares.retain(|_, users| {
            users.remove(user_id);
            !users.is_empty()
        });
    }
}
