//! planrun-planner — plan generation capability and plan validation
//!
//! The Planner trait is the opaque natural-language-to-plan seam: it turns a
//! prompt plus tool descriptors into raw text. parse_plan() turns that raw
//! text into a validated Plan, or fails. Generation and validation are kept
//! separate so validation stays a pure function.

pub mod ollama;
pub mod parse;
pub mod provider;

pub use ollama::OllamaPlanner;
pub use parse::parse_plan;
pub use provider::Planner;
