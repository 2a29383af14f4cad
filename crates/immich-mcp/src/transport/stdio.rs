//! Stdio transport: JSON-RPC lines on stdin, responses on stdout.
//!
//! Requests run as separate tasks so a later `notifications/cancelled` line
//! can reach one that is still in flight. Responses are written by a single
//! writer task in completion order.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcMessage, McpError, McpResult};

use super::framing;

const OUTBOX_CAPACITY: usize = 64;

pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    pub async fn run(&self) -> McpResult<()> {
        self.run_with(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve over arbitrary byte streams until `input` reaches EOF.
    pub async fn run_with<R, W>(&self, input: R, output: W) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbox, inbox) = mpsc::channel::<Value>(OUTBOX_CAPACITY);
        let writer = tokio::spawn(write_responses(inbox, output));

        let mut reader = BufReader::new(input);
        let mut line = String::new();
        let mut requests = JoinSet::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;
            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            match framing::parse_message(&line) {
                Ok(JsonRpcMessage::Request(request)) => {
                    let handler = self.handler.clone();
                    let outbox = outbox.clone();
                    requests.spawn(async move {
                        if let Some(response) =
                            handler.handle_message(JsonRpcMessage::Request(request)).await
                        {
                            let _ = outbox.send(response).await;
                        }
                    });
                }
                Ok(other) => {
                    if let Some(response) = self.handler.handle_message(other).await {
                        let _ = outbox.send(response).await;
                    }
                }
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    let _ = outbox.send(framing::unattributed_error(&e)?).await;
                }
            }

            while requests.try_join_next().is_some() {}
        }

        while requests.join_next().await.is_some() {}
        drop(outbox);

        writer
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?
    }
}

async fn write_responses<W>(mut inbox: mpsc::Receiver<Value>, mut output: W) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = inbox.recv().await {
        let framed = framing::frame_message(&response)?;
        output
            .write_all(framed.as_bytes())
            .await
            .map_err(McpError::Io)?;
        output.flush().await.map_err(McpError::Io)?;
    }
    Ok(())
}
