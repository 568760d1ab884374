//! Core types for planrun

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Tool input/output shape — a JSON object with tool-defined keys.
pub type JsonMap = Map<String, Value>;

/// Run identifier - cheaply cloneable
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct RunId(Arc<str>);

impl RunId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for RunId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Run lifecycle state. Completed and failed are absorbing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Outcome of a single executed step
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Failed,
}

/// A single step in an execution plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_number: u32,
    pub tool: String,
    pub input: JsonMap,
    /// Free text from the planner. Informational only, never drives control flow.
    pub reasoning: String,
}

/// Validated, ordered execution plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub steps: Vec<PlanStep>,
}

/// Recorded outcome of one step — one entry per step, carrying the attempt
/// count reached. Only the final outcome is recorded, not per-attempt detail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepResult {
    pub step_number: u32,
    pub tool: String,
    pub input: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<JsonMap>,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempt: u32,
}

impl StepResult {
    pub fn completed(step: &PlanStep, output: JsonMap, attempt: u32) -> Self {
        Self {
            step_number: step.step_number,
            tool: step.tool.clone(),
            input: step.input.clone(),
            output: Some(output),
            status: StepStatus::Completed,
            error: None,
            attempt,
        }
    }

    pub fn failed(step: &PlanStep, error: impl Into<String>, attempt: u32) -> Self {
        Self {
            step_number: step.step_number,
            tool: step.tool.clone(),
            input: step.input.clone(),
            output: None,
            status: StepStatus::Failed,
            error: Some(error.into()),
            attempt,
        }
    }
}

/// Complete run record — the single source of truth for one prompt's execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub prompt: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub execution_log: Vec<StepResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Run {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            run_id: RunId::generate(),
            prompt: prompt.into(),
            status: RunStatus::Pending,
            plan: None,
            execution_log: Vec::new(),
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Tool descriptor handed to planners
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
