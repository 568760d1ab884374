//! Ollama-backed planner over the local /api/chat endpoint

use crate::provider::Planner;
use planrun_core::{Error, Result, ToolDescriptor};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const OLLAMA_API_URL: &str = "http://localhost:11434/api/chat";

pub struct OllamaPlanner {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaPlanner {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            base_url: OLLAMA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn system_prompt(tools: &[ToolDescriptor]) -> String {
        let mut tools_info = String::new();
        for tool in tools {
            tools_info.push_str(&format!(
                "\nTool: {}\nDescription: {}\nInput Schema: {}\n",
                tool.name,
                tool.description,
                serde_json::to_string_pretty(&tool.input_schema).unwrap_or_default()
            ));
        }

        format!(
            "You are a task planning assistant. Convert the user's request into a \
             structured execution plan.\n\
             \n\
             Available Tools:\n{tools_info}\n\
             Respond with ONLY a valid JSON object (no markdown, no explanation):\n\
             {{\"steps\": [{{\"step_number\": 1, \"tool\": \"ToolName\", \
             \"input\": {{\"param\": \"value\"}}, \"reasoning\": \"why this step is needed\"}}]}}\n\
             \n\
             Rules:\n\
             1. Use only the tools listed above; names must match exactly\n\
             2. Input must match the tool's schema\n\
             3. Steps are executed sequentially, numbered from 1\n"
        )
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait::async_trait]
impl Planner for OllamaPlanner {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str, tools: &[ToolDescriptor]) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt(tools),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            // Low temperature for consistent JSON output
            options: ChatOptions { temperature: 0.1 },
        };

        debug!("ollama request: model={}", body.model);

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::plan_generation(format!("ollama request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::plan_generation(format!(
                "ollama error {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::plan_generation(format!("invalid ollama response: {}", e)))?;
        Ok(parsed.message.content)
    }
}
