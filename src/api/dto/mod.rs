pub mod account;
pub mod groups;
pub mod records;
pub mod resources;
pub mod sessions;
pub mod users;
