// stage/mod.rs
// Re-exports for the mechanism stage narrative

mod narrative;
mod types;

pub use narrative::*;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    #[error("Stage index {0} is outside 1..=5")]
    OutOfRange(u8),
}
