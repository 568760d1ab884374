//! Run store — concurrency-safe keyed storage of run records
//!
//! One RwLock per run: concurrent access to different runs never contends,
//! and readers always see a fully-formed snapshot. Every mutation goes
//! through `mutate`, which rejects writes to terminal runs so history is
//! never overwritten.

use chrono::Utc;
use dashmap::DashMap;
use planrun_core::{Error, Plan, Result, Run, RunId, RunStatus, StepResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct RunStore {
    runs: DashMap<RunId, Arc<RwLock<Run>>>,
}

impl Default for RunStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStore {
    pub fn new() -> Self {
        Self { runs: DashMap::new() }
    }

    /// Create a new pending run for the prompt. Runs are never deleted
    /// within the process lifetime.
    pub fn create(&self, prompt: &str) -> RunId {
        let run = Run::new(prompt);
        let run_id = run.run_id.clone();
        self.runs.insert(run_id.clone(), Arc::new(RwLock::new(run)));
        info!("run {} created", run_id);
        run_id
    }

    /// Snapshot of a run. Clones under the read lock, so a racing writer
    /// can never expose a half-appended log entry.
    pub async fn get(&self, run_id: &RunId) -> Result<Run> {
        let entry = self.entry(run_id)?;
        let run = entry.read().await;
        Ok(run.clone())
    }

    pub fn contains(&self, run_id: &RunId) -> bool {
        self.runs.contains_key(run_id)
    }

    pub async fn set_plan(&self, run_id: &RunId, plan: Plan) -> Result<()> {
        self.mutate(run_id, |run| {
            run.plan = Some(plan);
        })
        .await
    }

    pub async fn mark_running(&self, run_id: &RunId) -> Result<()> {
        self.mutate(run_id, |run| {
            run.status = RunStatus::Running;
        })
        .await
    }

    /// Append one step's final outcome to the execution log.
    pub async fn append_result(&self, run_id: &RunId, result: StepResult) -> Result<()> {
        self.mutate(run_id, |run| {
            run.execution_log.push(result);
        })
        .await
    }

    /// Terminal success: all steps completed.
    pub async fn complete(&self, run_id: &RunId) -> Result<()> {
        self.mutate(run_id, |run| {
            run.status = RunStatus::Completed;
            run.completed_at = Some(Utc::now());
        })
        .await?;
        info!("run {} completed", run_id);
        Ok(())
    }

    /// Terminal failure before any step ran (planner or parse failure).
    pub async fn fail_run(&self, run_id: &RunId, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        self.mutate(run_id, |run| {
            run.status = RunStatus::Failed;
            run.error = Some(reason.clone());
            run.completed_at = Some(Utc::now());
        })
        .await?;
        info!("run {} failed: {}", run_id, reason);
        Ok(())
    }

    /// Terminal failure at a step: the failed log entry and the status flip
    /// land in one critical section, so no reader can observe a failed run
    /// whose log is missing its final entry.
    pub async fn fail_step(
        &self,
        run_id: &RunId,
        result: StepResult,
        reason: impl Into<String>,
    ) -> Result<()> {
        let reason = reason.into();
        self.mutate(run_id, |run| {
            run.execution_log.push(result);
            run.status = RunStatus::Failed;
            run.error = Some(reason.clone());
            run.completed_at = Some(Utc::now());
        })
        .await?;
        info!("run {} failed: {}", run_id, reason);
        Ok(())
    }

    fn entry(&self, run_id: &RunId) -> Result<Arc<RwLock<Run>>> {
        self.runs
            .get(run_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| Error::RunNotFound(run_id.to_string()))
    }

    /// Serialized mutation of one run. Terminal runs reject all writes.
    async fn mutate<F>(&self, run_id: &RunId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Run),
    {
        let entry = self.entry(run_id)?;
        let mut run = entry.write().await;
        if run.status.is_terminal() {
            return Err(Error::RunFinished(run_id.to_string()));
        }
        f(&mut run);
        Ok(())
    }
}
