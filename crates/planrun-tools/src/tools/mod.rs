//! Builtin tool implementations
//!
//! One file per tool. To add a tool: create the file, implement the Tool
//! trait, register it in create_default_registry() in lib.rs.

pub mod calculator;
pub mod todo;
