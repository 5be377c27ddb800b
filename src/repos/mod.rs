/*
 * Responsibility
 * - In-process stores standing in for the persistence collaborator
 * - Each store synchronizes internally; handlers share them through AppState
 */
pub mod error;
pub mod group_repo;
pub mod property_repo;
pub mod record_repo;
pub mod session_repo;
pub mod share_repo;
pub mod user_repo;

pub use error::RepoError;
