// src/server/stdio.rs

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::server::protocol::{PARSE_ERROR, Response, handle_request, parse_message};
use crate::tools::ToolRouter;

/// Serve requests from `input` until EOF, writing responses to `output`.
///
/// Requests run concurrently. On EOF, in-flight requests are awaited and
/// their responses flushed before returning.
pub async fn serve<R, W>(router: Arc<ToolRouter>, input: R, output: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    info!("server started");

    let (tx, rx) = mpsc::channel::<Response>(64);
    let writer = tokio::spawn(write_loop(output, rx));
    let mut in_flight = JoinSet::new();

    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .await
            .context("reading input")?
            == 0
        {
            break;
        }

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_message(line.trim()),
            Err(e) => Err(Response::err(
                Value::Null,
                PARSE_ERROR,
                format!("parse error: input is not valid UTF-8: {e}"),
            )),
        };

        match parsed {
            Err(response) => {
                warn!(error = ?response.error, "rejected malformed message");
                if tx.send(response).await.is_err() {
                    break;
                }
            }
            Ok(request) => {
                let router = Arc::clone(&router);
                let tx = tx.clone();
                in_flight.spawn(async move {
                    if let Some(response) = handle_request(&router, request).await {
                        let _ = tx.send(response).await;
                    }
                });
            }
        }

        while let Some(joined) = in_flight.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "request task failed");
            }
        }
    }

    info!(pending = in_flight.len(), "input closed; waiting for in-flight requests");
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "request task failed");
        }
    }

    drop(tx);
    writer.await.context("joining writer task")??;

    info!("server stopped");
    Ok(())
}

async fn write_loop<W>(mut output: W, mut rx: mpsc::Receiver<Response>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let line = match serde_json::to_string(&response) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };
        output
            .write_all(line.as_bytes())
            .await
            .context("writing response")?;
        output.write_all(b"\n").await.context("writing response")?;
        output.flush().await.context("flushing output")?;
    }
    Ok(())
}
