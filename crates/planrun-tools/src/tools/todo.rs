//! TodoStore tool — in-memory todo CRUD
//!
//! State lives for the tool's lifetime only; the registry holds a single
//! shared instance, so all runs in a process see the same todo list.

use crate::registry::Tool;
use planrun_core::{Error, JsonMap, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl TodoItem {
    fn new(title: String, description: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description,
            completed: false,
            created_at: chrono::Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }
}

pub struct TodoStore {
    // Insertion order preserved separately so `list` is stable
    todos: RwLock<(HashMap<String, TodoItem>, Vec<String>)>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            todos: RwLock::new((HashMap::new(), Vec::new())),
        }
    }

    async fn add(&self, input: &JsonMap) -> Result<JsonMap> {
        let title = input
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if title.is_empty() {
            return Err(Error::tool_execution(
                self.name(),
                "'title' is required for add operation",
            ));
        }
        let description = input
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let todo = TodoItem::new(title.to_string(), description.to_string());
        let mut guard = self.todos.write().await;
        guard.1.push(todo.id.clone());
        guard.0.insert(todo.id.clone(), todo.clone());
        debug!("todo added: {} ({})", todo.title, todo.id);

        let mut output = JsonMap::new();
        output.insert("message".into(), json!("Todo added successfully"));
        output.insert("todo".into(), serde_json::to_value(&todo)?);
        Ok(output)
    }

    async fn list(&self) -> Result<JsonMap> {
        let guard = self.todos.read().await;
        let todos: Vec<&TodoItem> = guard.1.iter().filter_map(|id| guard.0.get(id)).collect();

        let mut output = JsonMap::new();
        output.insert("count".into(), json!(todos.len()));
        output.insert("todos".into(), serde_json::to_value(&todos)?);
        Ok(output)
    }

    async fn complete(&self, input: &JsonMap) -> Result<JsonMap> {
        let todo_id = self.require_id(input)?;
        let mut guard = self.todos.write().await;
        let todo = guard.0.get_mut(&todo_id).ok_or_else(|| {
            Error::tool_execution(self.name(), format!("todo with id '{}' not found", todo_id))
        })?;

        let message = if todo.completed {
            "Todo was already completed"
        } else {
            todo.completed = true;
            todo.completed_at = Some(chrono::Utc::now().to_rfc3339());
            "Todo marked as completed"
        };
        let todo = todo.clone();

        let mut output = JsonMap::new();
        output.insert("message".into(), json!(message));
        output.insert("todo".into(), serde_json::to_value(&todo)?);
        Ok(output)
    }

    async fn delete(&self, input: &JsonMap) -> Result<JsonMap> {
        let todo_id = self.require_id(input)?;
        let mut guard = self.todos.write().await;
        let todo = guard.0.remove(&todo_id).ok_or_else(|| {
            Error::tool_execution(self.name(), format!("todo with id '{}' not found", todo_id))
        })?;
        guard.1.retain(|id| id != &todo_id);

        let mut output = JsonMap::new();
        output.insert("message".into(), json!("Todo deleted successfully"));
        output.insert("deleted_todo".into(), serde_json::to_value(&todo)?);
        Ok(output)
    }

    fn require_id(&self, input: &JsonMap) -> Result<String> {
        match input.get("todo_id").and_then(|v| v.as_str()).map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(Error::tool_execution(
                self.name(),
                "'todo_id' is required for this operation",
            )),
        }
    }
}

#[async_trait::async_trait]
impl Tool for TodoStore {
    fn name(&self) -> &str {
        "TodoStore"
    }

    fn description(&self) -> &str {
        "Manages todo items. Supports operations: add, list, complete, delete. \
         State persists within the session."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "list", "complete", "delete"],
                    "description": "Operation to perform"
                },
                "title": {
                    "type": "string",
                    "description": "Todo title (required for 'add')"
                },
                "description": {
                    "type": "string",
                    "description": "Todo description (optional for 'add')"
                },
                "todo_id": {
                    "type": "string",
                    "description": "Todo ID (required for 'complete' and 'delete')"
                }
            },
            "required": ["operation"]
        })
    }

    async fn execute(&self, input: &JsonMap) -> Result<JsonMap> {
        let operation = input
            .get("operation")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match operation {
            "add" => self.add(input).await,
            "list" => self.list().await,
            "complete" => self.complete(input).await,
            "delete" => self.delete(input).await,
            "" => Err(Error::tool_execution(
                self.name(),
                "missing required field: 'operation'",
            )),
            other => Err(Error::tool_execution(
                self.name(),
                format!(
                    "invalid operation: '{}'. Must be one of: add, list, complete, delete",
                    other
                ),
            )),
        }
    }
}
