//! Runtime — one spawned task per run, wired planner → validator → executor
//!
//! create_run returns immediately; the caller observes progress only through
//! the run store. The spawned task's handle is retained per run so callers
//! that need a synchronization point (tests, the CLI) can wait on it.

use crate::executor::{Executor, ExecutorConfig};
use crate::store::RunStore;
use dashmap::DashMap;
use planrun_core::{Result, Run, RunId};
use planrun_planner::{parse_plan, Planner};
use planrun_tools::ToolRegistry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct Runtime {
    planner: Arc<dyn Planner>,
    tools: Arc<ToolRegistry>,
    store: Arc<RunStore>,
    executor: Executor,
    tasks: DashMap<RunId, JoinHandle<()>>,
}

impl Runtime {
    pub fn new(planner: Arc<dyn Planner>, tools: ToolRegistry, config: ExecutorConfig) -> Self {
        let tools = Arc::new(tools);
        let store = Arc::new(RunStore::new());
        let executor = Executor::new(tools.clone(), store.clone(), config);
        Self {
            planner,
            tools,
            store,
            executor,
            tasks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<RunStore> {
        &self.store
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Accept a prompt: create a pending run and spawn its execution task.
    /// Never blocks on planning or execution.
    pub fn create_run(&self, prompt: &str) -> RunId {
        let run_id = self.store.create(prompt);

        let planner = self.planner.clone();
        let store = self.store.clone();
        let executor = self.executor.clone();
        let descriptors = self.tools.descriptors();
        let known_tools = self.tools.names();
        let prompt = prompt.to_string();
        let id = run_id.clone();

        let handle = tokio::spawn(async move {
            let raw = match planner.generate(&prompt, &descriptors).await {
                Ok(raw) => raw,
                Err(e) => {
                    // Run fails before any step: no plan, no log entries
                    let _ = store.fail_run(&id, e.to_string()).await;
                    return;
                }
            };

            let plan = match parse_plan(&raw, &known_tools) {
                Ok(plan) => plan,
                Err(e) => {
                    let _ = store.fail_run(&id, e.to_string()).await;
                    return;
                }
            };

            info!("run {} planned: {} step(s)", id, plan.steps.len());
            if let Err(e) = store.set_plan(&id, plan.clone()).await {
                error!("run {}: failed to attach plan: {}", id, e);
                return;
            }

            if let Err(e) = executor.execute(&id, &plan).await {
                error!("run {}: execution error: {}", id, e);
            }
        });
        self.tasks.insert(run_id.clone(), handle);

        run_id
    }

    /// Snapshot of a run's current state. Safe to call while the run
    /// executes; may race with writes but never sees a partial record.
    pub async fn get_run(&self, run_id: &RunId) -> Result<Run> {
        self.store.get(run_id).await
    }

    /// Wait for a run's spawned task to finish. Returns immediately if the
    /// task already completed or was never spawned here.
    pub async fn wait(&self, run_id: &RunId) {
        if let Some((_, handle)) = self.tasks.remove(run_id) {
            if let Err(e) = handle.await {
                error!("run {} task panicked: {}", run_id, e);
            }
        }
    }
}
