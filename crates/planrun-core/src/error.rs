//! Error types for planrun

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("plan generation failed: {0}")]
    PlanGeneration(String),

    #[error("plan parse failed: {0}")]
    PlanParse(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool error: {tool} - {message}")]
    ToolExecution { tool: String, message: String },

    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("run already finished: {0}")]
    RunFinished(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn plan_generation(message: impl Into<String>) -> Self {
        Self::PlanGeneration(message.into())
    }

    pub fn plan_parse(message: impl Into<String>) -> Self {
        Self::PlanParse(message.into())
    }

    pub fn tool_execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Only tool execution failures are retried by the executor.
    /// Structural failures (unknown tool, malformed plan) are fatal on first sight.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::ToolExecution { .. })
    }
}
