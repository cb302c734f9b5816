//! Cursor-driven ingestion of chain containers.

pub mod cursor;
pub mod fetcher;
pub mod mapper;
pub mod writer;

pub use cursor::{CachedTip, SyncCursor};
pub use fetcher::ContainerFetcher;
pub use mapper::{ContainerDecoder, DecodedContainer, MapperContext};
pub use writer::PersistenceWriter;
