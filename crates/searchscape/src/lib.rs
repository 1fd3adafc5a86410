//! SearchScape: core library for image search, filter dispatch, and per-user image sessions.

pub mod filter;
pub mod inference;
pub mod search;
pub mod store;
pub mod types;

pub use filter::Filter;
pub use inference::InferenceClient;
pub use search::SearchClient;
pub use store::SessionStore;
pub use types::*;
