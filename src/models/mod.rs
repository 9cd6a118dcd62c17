pub mod draft;
pub mod entry;
pub mod filter;
