//! Step executor — drives a plan to a terminal run state
//!
//! Steps run strictly in order. Tool execution failures are retried with
//! exponential backoff up to a configured attempt limit; structural
//! failures (unknown tool) are fatal on first sight. A failed step
//! short-circuits the run: later steps never start.

use crate::store::RunStore;
use planrun_core::{Plan, PlanStep, Result, Run, RunId, StepResult};
use planrun_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Total attempts per step, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles (by multiplier) after that.
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }
}

#[derive(Clone)]
pub struct Executor {
    tools: Arc<ToolRegistry>,
    store: Arc<RunStore>,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(tools: Arc<ToolRegistry>, store: Arc<RunStore>, config: ExecutorConfig) -> Self {
        Self { tools, store, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute a validated plan against a pending run.
    ///
    /// Re-invoking on a run that already reached a terminal state is a
    /// no-op returning the existing record; no tool runs twice.
    pub async fn execute(&self, run_id: &RunId, plan: &Plan) -> Result<Run> {
        let snapshot = self.store.get(run_id).await?;
        if snapshot.status.is_terminal() {
            debug!("run {} already terminal, skipping execution", run_id);
            return Ok(snapshot);
        }

        self.store.mark_running(run_id).await?;

        for step in &plan.steps {
            let tool = match self.tools.get(&step.tool) {
                Some(tool) => tool,
                None => {
                    // Structural failure: never retried
                    let reason = format!("unknown tool: {}", step.tool);
                    warn!("run {} step {}: {}", run_id, step.step_number, reason);
                    self.store
                        .fail_step(
                            run_id,
                            StepResult::failed(step, &reason, 1),
                            format!("step {} failed: {}", step.step_number, reason),
                        )
                        .await?;
                    return self.store.get(run_id).await;
                }
            };

            let mut attempt = 1u32;
            let mut delay = self.config.initial_delay;
            loop {
                match tool.execute(&step.input).await {
                    Ok(output) => {
                        debug!(
                            "run {} step {} completed (attempt {})",
                            run_id, step.step_number, attempt
                        );
                        self.store
                            .append_result(run_id, StepResult::completed(step, output, attempt))
                            .await?;
                        break;
                    }
                    Err(e) if e.is_retriable() && attempt < self.config.max_attempts => {
                        warn!(
                            "run {} step {} attempt {} failed: {} (retrying in {:?})",
                            run_id, step.step_number, attempt, e, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay = delay.mul_f64(self.config.backoff_multiplier);
                        attempt += 1;
                    }
                    Err(e) => {
                        warn!(
                            "run {} step {} failed after {} attempt(s): {}",
                            run_id, step.step_number, attempt, e
                        );
                        self.fail_at_step(run_id, step, &e.to_string(), attempt).await?;
                        return self.store.get(run_id).await;
                    }
                }
            }
        }

        self.store.complete(run_id).await?;
        self.store.get(run_id).await
    }

    async fn fail_at_step(
        &self,
        run_id: &RunId,
        step: &PlanStep,
        error: &str,
        attempt: u32,
    ) -> Result<()> {
        self.store
            .fail_step(
                run_id,
                StepResult::failed(step, error, attempt),
                format!("step {} failed: {}", step.step_number, error),
            )
            .await
    }
}
