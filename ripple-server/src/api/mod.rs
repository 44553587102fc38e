pub mod error;
pub mod feed;
pub mod posts;
pub mod seed;
pub mod users;

pub use error::{ApiError, ApiResult};
