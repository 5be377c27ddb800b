pub mod client;
pub mod memory;
pub mod valkey;

pub use client::{CacheError, IdentityCache};
pub use memory::MemoryIdentityCache;
pub use valkey::ValkeyIdentityCache;
