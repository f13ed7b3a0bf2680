// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The request loop.
//!
//! Single-threaded with respect to RPCs: one request is read, handled,
//! and answered before the next is read. Parallelism safety comes from
//! the filesystem primitives, not from here. The loop is generic over
//! reader/writer so tests can drive it over buffers.

use crate::protocol::{self, CallParams, ProtocolError, Request};
use crate::tools;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use troupe_core::{Clock, SystemClock};
use troupe_store::{Config, StateRoot};

/// Shared context for every tool handler.
pub struct Ctx {
    pub root: StateRoot,
    pub config: Config,
    clock: SystemClock,
}

impl Ctx {
    pub fn new(root: StateRoot, config: Config) -> Self {
        Self {
            root,
            config,
            clock: SystemClock,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.epoch_ms()
    }
}

/// The MCP server over any line-delimited transport.
pub struct Server {
    ctx: Ctx,
}

impl Server {
    pub fn new(ctx: Ctx) -> Self {
        Self { ctx }
    }

    /// Serve until EOF. IO errors terminate the loop; per-request
    /// failures are answered in-band and the loop continues.
    pub async fn run<R, W>(self, reader: R, mut writer: W) -> Result<(), ProtocolError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if line.len() > protocol::MAX_LINE_LEN {
                return Err(ProtocolError::LineTooLarge(line.len()));
            }

            let request: Request = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    let response = protocol::error_response(
                        &Value::Null,
                        protocol::PARSE_ERROR,
                        &e.to_string(),
                    );
                    write_line(&mut writer, &response).await?;
                    continue;
                }
            };

            if request.is_notification() {
                tracing::debug!(method = %request.method, "notification");
                continue;
            }

            let response = self.handle(&request).await;
            write_line(&mut writer, &response).await?;
        }
        Ok(())
    }

    async fn handle(&self, request: &Request) -> Value {
        let id = request.id.clone().unwrap_or(Value::Null);
        tracing::debug!(method = %request.method, "request");

        match request.method.as_str() {
            "initialize" => protocol::response(&id, protocol::initialize_result()),
            "ping" => protocol::response(&id, serde_json::json!({})),
            "tools/list" => protocol::response(
                &id,
                serde_json::json!({ "tools": tools::definitions() }),
            ),
            "tools/call" => {
                let params: CallParams = match serde_json::from_value(request.params.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return protocol::error_response(
                            &id,
                            protocol::INVALID_PARAMS,
                            &e.to_string(),
                        )
                    }
                };
                match tools::dispatch(&self.ctx, &params.name, &params.arguments).await {
                    Ok(payload) => protocol::response(&id, protocol::tool_result(&payload, false)),
                    Err(e) => {
                        tracing::warn!(tool = %params.name, error = %e, "tool failed");
                        let payload = serde_json::json!({
                            "error": e.kind,
                            "message": e.message,
                        });
                        protocol::response(&id, protocol::tool_result(&payload, true))
                    }
                }
            }
            other => protocol::error_response(
                &id,
                protocol::METHOD_NOT_FOUND,
                &format!("unknown method {other:?}"),
            ),
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(
    writer: &mut W,
    value: &Value,
) -> Result<(), ProtocolError> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
