pub mod codec;
pub mod node;
pub mod persistence;
