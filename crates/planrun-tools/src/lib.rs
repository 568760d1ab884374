//! planrun-tools — tool trait, registry, and builtin tools
//!
//! Each tool is a self-contained file in src/tools/.
//! To add a tool: create the file, implement Tool trait, register below.

pub mod registry;
pub mod tools;

pub use registry::{Tool, ToolRegistry};
pub use tools::calculator::Calculator;
pub use tools::todo::TodoStore;

/// Create the default tool registry with all builtin tools.
///
/// The registry is built once at startup and never mutated afterwards.
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Calculator);
    registry.register(TodoStore::new());
    registry
}
