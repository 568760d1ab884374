//! Planner trait

use planrun_core::{Result, ToolDescriptor};

/// Plan generation capability.
///
/// Implementations produce raw text that should contain a JSON plan; the
/// engine never inspects how it was produced. Failures surface as
/// `Error::PlanGeneration`.
#[async_trait::async_trait]
pub trait Planner: Send + Sync {
    fn name(&self) -> &str;

    /// Generate a raw plan for the prompt, given the available tools.
    async fn generate(&self, prompt: &str, tools: &[ToolDescriptor]) -> Result<String>;
}
