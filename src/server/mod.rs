use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub mod protocol;

use crate::config::ServerConfig;
use crate::tools::{contracts, TranscriptTools};
use protocol::{
    McpRequest, McpResponse, DEFAULT_PROTOCOL_VERSION, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};

/// MCP server speaking newline-delimited JSON-RPC
pub struct McpServer {
    tools: TranscriptTools,
    config: ServerConfig,
}

impl McpServer {
    pub fn new(tools: TranscriptTools, config: ServerConfig) -> Self {
        Self { tools, config }
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        tracing::info!("MCP server '{}' listening on stdio", self.config.name);

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve on arbitrary streams, one JSON message per line
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read from client")? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut payload =
                    serde_json::to_string(&response).context("Failed to serialize response")?;
                payload.push('\n');

                writer
                    .write_all(payload.as_bytes())
                    .await
                    .context("Failed to write to client")?;
                writer.flush().await.context("Failed to flush client stream")?;
            }
        }

        tracing::info!("Client closed the connection, shutting down");
        Ok(())
    }

    /// Handle one raw message, returning the response if one is owed
    pub async fn handle_message(&self, raw: &str) -> Option<McpResponse> {
        let message: Value = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Discarding malformed message: {}", e);
                return Some(McpResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // Well-formed JSON that is not a request keeps whatever id it carried
        let request: McpRequest = match serde_json::from_value(message.clone()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Rejecting invalid request: {}", e);
                let id = message.get("id").cloned().unwrap_or(Value::Null);
                return Some(McpResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.is_notification() {
            tracing::debug!("Received notification {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::failure(
                id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        tracing::debug!("Handling request {}", request.method);

        let response = match request.method.as_str() {
            "initialize" => McpResponse::success(id, self.initialize_result(&request.params)),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => {
                McpResponse::success(id, json!({ "tools": contracts::tool_definitions() }))
            }
            "tools/call" => self.call_tool(id, &request.params).await,
            method => McpResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            ),
        };

        Some(response)
    }

    fn initialize_result(&self, params: &Value) -> Value {
        let protocol_version = params["protocolVersion"]
            .as_str()
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        let mut result = json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.config.name,
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        if let Some(instructions) = &self.config.instructions {
            result["instructions"] = json!(instructions);
        }

        result
    }

    async fn call_tool(&self, id: Value, params: &Value) -> McpResponse {
        let Some(name) = params["name"].as_str() else {
            return McpResponse::failure(id, INVALID_PARAMS, "Invalid params: missing tool name");
        };
        let arguments = params["arguments"].clone();

        match self.tools.call(name, arguments).await {
            Ok(text) => McpResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            ),
            Err(e) => {
                tracing::warn!("Rejected tool call: {}", e);
                McpResponse::failure(id, INVALID_PARAMS, e.to_string())
            }
        }
    }
}
