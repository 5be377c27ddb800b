pub mod decision;
pub mod factory;
pub mod password;
pub mod token;
pub mod totp;
pub mod types;

pub use decision::{AuthService, permits};
pub use factory::build_auth_service;
