//! Uniform response body: `{code, message, data?}`.
//!
//! Transport status is always 200; clients branch on `code` only.
//! - `1`  success, carries `data` (possibly `null`)
//! - `-1` not found, no `data`
//! - anything else: application error code chosen by the failing call site

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

pub const SUCCESS_CODE: i32 = 1;
pub const NOT_FOUND_CODE: i32 = -1;
pub const SUCCESS_MESSAGE: &str = "success";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn success<T: Serialize>(data: T) -> Response {
    match serde_json::to_value(data) {
        Ok(data) => Envelope {
            code: SUCCESS_CODE,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "response payload could not be serialized");
            fail(500, "internal server error")
        }
    }
}

pub fn fail(code: i32, message: impl Into<String>) -> Response {
    Envelope {
        code,
        message: message.into(),
        data: None,
    }
    .into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    fail(NOT_FOUND_CODE, message)
}

#[cfg(test)]
pub(crate) async fn read_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
