// Application layer - use cases over the in-memory store.

pub mod error;
mod service;

pub use error::*;
pub use service::*;
