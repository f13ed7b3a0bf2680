// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Team bookkeeping tools.

use crate::error::{CoordError, ErrorKind};
use crate::server::Ctx;
use serde::Deserialize;
use serde_json::{json, Value};
use troupe_core::{short_session_id, validate_artifact_id, TeamRecord};
use troupe_store::teams;

#[derive(Debug, Deserialize)]
pub struct CreateArgs {
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

pub fn create(ctx: &Ctx, args: CreateArgs) -> Result<Value, CoordError> {
    let name = validate_artifact_id(&args.name)?.to_string();
    let mut team = TeamRecord::new(&name, args.project.as_deref().unwrap_or(""), ctx.now());
    for member in &args.members {
        team.add_member(short_session_id(member)?);
    }

    if !teams::create(&ctx.root, &team)? {
        return Err(CoordError::new(
            ErrorKind::Conflict,
            format!("team {name:?} already exists"),
        ));
    }
    Ok(json!({ "team": team }))
}

#[derive(Debug, Deserialize)]
pub struct GetArgs {
    pub name: String,
}

pub fn get(ctx: &Ctx, args: GetArgs) -> Result<Value, CoordError> {
    let name = validate_artifact_id(&args.name)?;
    match teams::load(&ctx.root, name)? {
        Some(team) => Ok(json!({ "team": team })),
        None => Err(CoordError::not_found(format!("team {name:?}"))),
    }
}

pub fn list(ctx: &Ctx) -> Result<Value, CoordError> {
    Ok(json!({ "teams": teams::list(&ctx.root)? }))
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
