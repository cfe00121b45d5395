pub mod common;
pub mod inventory;

pub use common::{PaginatedResponse, PaginationMeta, PaginationParams};
