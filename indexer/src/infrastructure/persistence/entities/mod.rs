pub mod blocks;
pub mod events;
pub mod sync_statuses;
pub mod transactions;
