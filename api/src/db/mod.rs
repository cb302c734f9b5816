// Database Module
// Connection pool, error type and read repositories over the indexer tables

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DbError;
pub use pool::DbPool;
pub use repositories::Repositories;
