/*
 * Responsibility
 * - request DTOs shared by assets / credentials / commands
 * - kind-specific fields are passed through untouched (`attrs`)
 */
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub name: String,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl CreateRecordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub name: Option<String>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl UpdateRecordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        Ok(())
    }
}

/// `POST /{kind}/{id}/change-owner?owner=<user id>`
#[derive(Debug, Deserialize)]
pub struct ChangeOwnerQuery {
    pub owner: String,
}
