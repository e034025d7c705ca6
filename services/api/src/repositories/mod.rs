//! Repositories for database operations

pub mod movie;
pub mod user;

// Re-export for convenience
pub use movie::MovieRepository;
pub use user::UserRepository;
