pub mod api;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod preview;
pub mod prompt;
pub mod render;
pub mod repo;
pub mod transactions;
pub mod utils;
pub mod verify;
pub mod vfs;
