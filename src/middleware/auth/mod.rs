pub mod access;
pub mod classifier;
