pub mod admin;
pub mod entries;
pub mod exports;
pub mod health;
