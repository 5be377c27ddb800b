use serde::Deserialize;

/// `POST /resources/{id}/assign`: full replacement of the user set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// `POST /resources/add` and `/resources/remove`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub user_id: String,
    #[serde(default)]
    pub resource_ids: Vec<String>,
}
