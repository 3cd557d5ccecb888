//! In-process adapters for the account store and analytics sink.

mod analytics;
mod user_repository;

pub use analytics::InMemoryAnalyticsSink;
pub use user_repository::InMemoryUserRepository;
