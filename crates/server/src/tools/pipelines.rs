// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline tools.

use crate::error::CoordError;
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use troupe_core::StepSpec;
use troupe_engine::pipeline;

#[derive(Debug, Deserialize)]
pub struct RunArgs {
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub pipeline_id: Option<String>,
}

/// Validate, record, and start the driver task. The RPC returns with
/// the pipeline id; completion is observed via `coord_get_pipeline` or
/// the done marker.
pub fn run(ctx: &Ctx, args: RunArgs) -> Result<Value, CoordError> {
    let directory = args
        .directory
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let meta = pipeline::prepare(&ctx.root, &args.steps, &directory, args.pipeline_id.as_deref())?;
    let pipeline_id = meta.pipeline_id.clone();

    let root = ctx.root.clone();
    let config = ctx.config.clone();
    let steps = args.steps;
    tokio::spawn(async move {
        if let Err(e) = pipeline::drive(&root, &config, meta, steps).await {
            tracing::error!(error = %e, "pipeline driver failed");
        }
    });

    Ok(json!({ "pipeline_id": pipeline_id, "status": "running" }))
}

#[derive(Debug, Deserialize)]
pub struct GetArgs {
    pub pipeline_id: String,
}

pub fn get(ctx: &Ctx, args: GetArgs) -> Result<Value, CoordError> {
    let meta = pipeline::pipeline_report(&ctx.root, &args.pipeline_id)?;
    Ok(json!({ "pipeline": meta }))
}

#[cfg(test)]
#[path = "pipelines_tests.rs"]
mod tests;
