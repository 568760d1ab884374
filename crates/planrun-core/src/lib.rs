//! planrun-core — shared types and errors for the planrun execution engine

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
