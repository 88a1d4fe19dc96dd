//! Query functions, one zero-sized repository per table.

pub mod comment_repo;
pub mod like_repo;
pub mod rating_repo;

pub use comment_repo::CommentRepo;
pub use like_repo::LikeRepo;
pub use rating_repo::RatingRepo;
