//! Tool registry and trait definitions
//!
//! Each tool is a self-contained module implementing the Tool trait.
//! The registry is assembled once at startup and treated as immutable
//! afterwards, so executor reads need no synchronization.

use planrun_core::{Error, JsonMap, Result, ToolDescriptor};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The Tool trait — implement this to add a new capability.
///
/// A tool takes a JSON object of tool-defined shape and either returns an
/// output object or fails with `Error::ToolExecution`. Input shape validation
/// is the tool's own responsibility; the engine only routes by name.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name (e.g. "Calculator", "TodoStore").
    fn name(&self) -> &str;

    /// Human-readable description sent to the planner.
    fn description(&self) -> &str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given input object.
    async fn execute(&self, input: &JsonMap) -> Result<JsonMap>;

    /// Convert to the descriptor format handed to planners.
    fn to_descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    /// Registration happens at startup only; the registry is read-only afterwards.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Look up a tool, failing with `Error::UnknownTool` if absent.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.get(name).ok_or_else(|| Error::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Execute a registered tool by name.
    pub async fn execute(&self, name: &str, input: &JsonMap) -> Result<JsonMap> {
        self.resolve(name)?.execute(input).await
    }

    /// Descriptors for all registered tools.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.to_descriptor()).collect()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Registered tool names as owned strings, for the plan validator.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}
