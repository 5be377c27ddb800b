/*
 * Responsibility
 * - ownable records: assets, credentials, commands
 * - `owner` is the creating user's id; everything kind-specific lives in `attrs`
 */
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::repos::error::RepoError;

// Keys owned by the record itself; never stored in `attrs`.
const RESERVED: [&str; 4] = ["id", "name", "owner", "created"];

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub created: DateTime<Utc>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: &str, owner: &str, attrs: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            owner: owner.to_string(),
            created: Utc::now(),
            attrs: strip_reserved(attrs),
        }
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug)]
pub struct RecordRepo {
    resource: &'static str,
    rows: RwLock<HashMap<String, Record>>,
}

impl RecordRepo {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn create(&self, owner: &str, name: &str, attrs: Map<String, Value>) -> Record {
        let record = Record::new(uuid::Uuid::new_v4().to_string(), name, owner, attrs);
        self.insert(record.clone());
        record
    }

    pub fn insert(&self, record: Record) {
        self.rows.write().insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.rows.read().get(id).cloned()
    }

    pub fn owner_of(&self, id: &str) -> Result<String, RepoError> {
        self.rows
            .read()
            .get(id)
            .map(|r| r.owner.clone())
            .ok_or(RepoError::NotFound(self.resource))
    }

    /// Records accepted by `visible`, newest first.
    pub fn list_where(&self, visible: impl Fn(&Record) -> bool) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .rows
            .read()
            .values()
            .filter(|r| visible(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created.cmp(&a.created));
        records
    }

    /// Merge `attrs` into the record; `null` values remove a key.
    pub fn update(
        &self,
        id: &str,
        name: Option<&str>,
        attrs: Map<String, Value>,
    ) -> Result<Record, RepoError> {
        let mut rows = self.rows.write();
        let record = rows.get_mut(id).ok_or(RepoError::NotFound(self.resource))?;

        if let Some(name) = name {
            record.name = name.to_string();
        }
        for (key, value) in strip_reserved(attrs) {
            if value.is_null() {
                record.attrs.remove(&key);
            } else {
                record.attrs.insert(key, value);
            }
        }

        Ok(record.clone())
    }

    pub fn change_owner(&self, id: &str, owner: &str) -> Result<Record, RepoError> {
        let mut rows = self.rows.write();
        let record = rows.get_mut(id).ok_or(RepoError::NotFound(self.resource))?;
        record.owner = owner.to_string();
        Ok(record.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.rows.write().remove(id).is_some()
    }
}

fn strip_reserved(mut attrs: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED {
        attrs.remove(key);
    }
    attrs
}
