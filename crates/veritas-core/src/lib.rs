//! veritas-core
//!
//! Shared domain types, the error taxonomy, capability traits
//! (embedding, generation, document source), configuration loading and
//! the deterministic character-window chunker, and the request deadline
//! shared by the HTTP capability clients.

pub mod chunker;
pub mod config;
pub mod deadline;
pub mod error;
pub mod source;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
