mod post_repository;
mod user_repository;

pub use post_repository::PostRepository;
pub use user_repository::{is_unique_violation, UserRepository};
