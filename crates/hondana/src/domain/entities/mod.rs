pub mod cache;
pub mod entry;
