// anesthetic/mod.rs
// Re-exports for the anesthetic registry

mod registry;
mod types;

pub use registry::*;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown anesthetic: {0}")]
    UnknownAnesthetic(String),
    #[error("Unknown anesthetic class: {0}")]
    UnknownClass(String),
    #[error("Invalid onset range: {0:?}")]
    InvalidOnset(String),
    #[error("Invalid profile for {name}: {reason}")]
    InvalidProfile { name: String, reason: String },
}
