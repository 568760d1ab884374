//! planrun-runtime — run store, step executor, and the per-run task runtime

pub mod executor;
pub mod runtime;
pub mod store;

pub use executor::{Executor, ExecutorConfig};
pub use runtime::Runtime;
pub use store::RunStore;
