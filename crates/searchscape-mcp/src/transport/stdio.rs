//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::McpResult;

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Serve stdin until EOF, replying on stdout.
    pub async fn run(&self) -> McpResult<()> {
        tracing::info!("SearchScape MCP server running on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `input` until EOF.
    pub async fn serve<R, W>(&self, input: R, mut output: W) -> McpResult<()>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(input);
        let mut line = Vec::new();

        loop {
            line.clear();
            let bytes_read = reader.read_until(b'\n', &mut line).await?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            // A bad line gets an error reply; only I/O failures end the loop.
            let framed = match framing::decode_line(&line) {
                Ok(msg) => {
                    tracing::trace!("<- {}", msg.method().unwrap_or("(reply)"));
                    match self.handler.handle_message(msg).await {
                        Some(response) => framing::frame_message(&response)?,
                        None => continue,
                    }
                }
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    framing::frame_parse_error(&e)?
                }
            };

            output.write_all(framed.as_bytes()).await?;
            output.flush().await?;
        }

        Ok(())
    }
}
