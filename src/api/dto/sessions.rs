use serde::Deserialize;

pub const DEFAULT_WIDTH: u32 = 80;
pub const DEFAULT_HEIGHT: u32 = 24;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub asset_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// `POST /sessions/{id}/resize?width=&height=`
#[derive(Debug, Deserialize)]
pub struct ResizeQuery {
    pub width: u32,
    pub height: u32,
}

impl ResizeQuery {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be positive");
        }
        Ok(())
    }
}

/// Query of the public transport endpoints (`/tunnel`, `/ssh`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportQuery {
    pub session_id: Option<String>,
}
