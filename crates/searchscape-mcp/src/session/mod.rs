//! Session management for fetched images.

pub mod manager;

pub use manager::ImageSessionManager;
