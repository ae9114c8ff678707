//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::error::Result;
use crate::mcp::args::Arguments;
use crate::mcp::tools::{Services, ToolHandler};
use crate::mcp::types::*;

/// MCP Server info
pub const SERVER_NAME: &str = "mcp-integration-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for GitHub, Jira and Notion
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(services: Services) -> Self {
        Self {
            tool_handler: ToolHandler::new(services),
        }
    }

    /// Run the server on stdio
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Serve line-delimited JSON-RPC until the reader is exhausted.
    ///
    /// Each non-blank line produces exactly one response line, including
    /// lines that are not valid UTF-8. A read error ends the loop like end
    /// of input does; only write failures are returned.
    pub async fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Error reading from stdin: {}", e);
                    break;
                }
            }

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let response = self.handle_message(&line).await;
            let response_str = serde_json::to_string(&response)?;
            writeln!(writer, "{}", response_str)?;
            writer.flush()?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw incoming JSON-RPC message
    pub async fn handle_message(&self, message: &[u8]) -> JsonRpcResponse {
        let request: JsonRpcRequest = match serde_json::from_slice(message) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!("Failed to parse request: {}", e);
                return JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error(e.to_string()));
            }
        };

        self.handle_request(request).await
    }

    /// Route a decoded request to its method handler
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Handling method {}", request.method);

        match request.method.as_str() {
            methods::INITIALIZE => JsonRpcResponse::success(request.id, self.handle_initialize()),
            methods::LIST_TOOLS => JsonRpcResponse::success(request.id, self.handle_list_tools()),
            methods::CALL_TOOL => match self.handle_call_tool(request.params.as_ref()).await {
                Ok(result) => JsonRpcResponse::success(request.id, result),
                Err(error) => JsonRpcResponse::error(request.id, error),
            },
            _ => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Value {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        to_value_or_null(result)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Value {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        to_value_or_null(result)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, params: Option<&Value>) -> std::result::Result<Value, JsonRpcError> {
        let params = match params {
            Some(Value::Object(params)) => params,
            _ => return Err(JsonRpcError::invalid_params("Invalid params")),
        };

        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => return Err(JsonRpcError::invalid_params("Missing tool name")),
        };

        let args = Arguments::from_value(params.get("arguments"));
        let result = self.tool_handler.call_tool(name, args).await;
        Ok(to_value_or_null(result))
    }
}

/// Serialize a protocol result; a failure is logged and yields null
fn to_value_or_null<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize result: {}", e);
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info() {
        assert_eq!(SERVER_NAME, "mcp-integration-server");
        assert_eq!(SERVER_VERSION, "1.0.0");
    }
}
