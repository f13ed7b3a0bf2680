// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline records.
//!
//! A pipeline is an ordered sequence of pipe-worker steps executed
//! sequentially. Each step is an ordinary worker whose task id is
//! `<pipeline_id>-<n>-<name>`; the pipeline meta aggregates their states.

use crate::worker::WorkerStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: String,
    pub prompt: String,
    /// Working directory override; defaults to the pipeline's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Per-step execution state, recorded in the pipeline meta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepState {
    pub name: String,
    /// Task id of the worker that runs (or ran) this step.
    pub task_id: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
    /// A preceding step failed before this one started.
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Running => write!(f, "running"),
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Failed => write!(f, "failed"),
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl From<WorkerStatus> for StepStatus {
    fn from(status: WorkerStatus) -> Self {
        match status {
            WorkerStatus::Running => StepStatus::Running,
            WorkerStatus::Completed => StepStatus::Completed,
            WorkerStatus::Failed | WorkerStatus::Unknown => StepStatus::Failed,
        }
    }
}

/// Aggregate pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Running,
    Completed,
    Failed,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Running => write!(f, "running"),
            PipelineStatus::Completed => write!(f, "completed"),
            PipelineStatus::Failed => write!(f, "failed"),
        }
    }
}

/// `<pipeline_id>.meta.json` under `results/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMeta {
    pub pipeline_id: String,
    pub directory: String,
    pub status: PipelineStatus,
    pub steps: Vec<StepState>,
    pub created: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_session_id: Option<String>,
}

impl PipelineMeta {
    /// Build the initial meta: all steps pending, with derived task ids.
    pub fn new(pipeline_id: &str, directory: &str, steps: &[StepSpec], created: u64) -> Self {
        let steps = steps
            .iter()
            .enumerate()
            .map(|(i, s)| StepState {
                name: s.name.clone(),
                task_id: step_task_id(pipeline_id, i, &s.name),
                status: StepStatus::Pending,
            })
            .collect();
        Self {
            pipeline_id: pipeline_id.to_string(),
            directory: directory.to_string(),
            status: PipelineStatus::Running,
            steps,
            created,
            finished: None,
            notify_session_id: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, PipelineStatus::Running)
    }
}

/// Task id of step `index` of a pipeline.
pub fn step_task_id(pipeline_id: &str, index: usize, name: &str) -> String {
    format!("{pipeline_id}-{index}-{name}")
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
