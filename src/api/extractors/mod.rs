pub mod auth_ctx;
pub mod paging;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use paging::PageQuery;
