//! MCP test client
//!
//! A minimal MCP client over WebSocket for exercising the adapter the way
//! an LLM client would.

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub struct McpTestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_id: i64,
}

impl McpTestClient {
    /// Connect without performing the initialize handshake.
    pub async fn connect_raw(base_url: &str) -> Self {
        let ws_url = base_url.replace("http://", "ws://") + "/v1/mcp";
        let (ws, _) = connect_async(&ws_url)
            .await
            .expect("Failed to connect to MCP WebSocket");
        Self { ws, next_id: 1 }
    }

    /// Connect and complete the initialize handshake.
    pub async fn connect(base_url: &str) -> Self {
        let mut client = Self::connect_raw(base_url).await;
        let response = client
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "e2e-tests", "version": "0.0.0"}
                })),
            )
            .await;
        assert!(
            response.get("error").is_none(),
            "initialize failed: {}",
            response
        );
        client.notify("notifications/initialized").await;
        client
    }

    /// Send a request and wait for its response.
    pub async fn request(&mut self, method: &str, params: Option<Value>) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let mut message = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
        });
        if let Some(params) = params {
            message["params"] = params;
        }

        self.ws
            .send(Message::Text(message.to_string().into()))
            .await
            .expect("Failed to send MCP request");

        while let Some(result) = self.ws.next().await {
            let msg = result.expect("WebSocket error");
            if let Message::Text(text) = msg {
                let value: Value =
                    serde_json::from_str(text.as_str()).expect("Unparseable MCP response");
                if value.get("id") == Some(&json!(id)) || value.get("id").is_none() {
                    return value;
                }
            }
        }
        panic!("Connection closed before response to {}", method);
    }

    /// Send a notification (no response expected).
    pub async fn notify(&mut self, method: &str) {
        let message = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": method,
        });
        self.ws
            .send(Message::Text(message.to_string().into()))
            .await
            .expect("Failed to send MCP notification");
    }

    /// Send an arbitrary text frame and return the next response.
    pub async fn send_raw(&mut self, text: &str) -> Value {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send raw frame");

        while let Some(result) = self.ws.next().await {
            let msg = result.expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Unparseable MCP response");
            }
        }
        panic!("Connection closed before response to raw frame");
    }

    /// Invoke a tool and return the full JSON-RPC response.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.request(
            "tools/call",
            Some(json!({
                "name": name,
                "arguments": arguments,
            })),
        )
        .await
    }
}

/// Extract the text content of a successful tools/call response.
pub fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("No text content in tool response: {}", response))
}

/// Parse the text content of a tools/call response as JSON.
pub fn tool_json(response: &Value) -> Value {
    serde_json::from_str(tool_text(response))
        .unwrap_or_else(|e| panic!("Tool content is not JSON ({}): {}", e, response))
}

/// Whether the tools/call response is a tool-level error.
pub fn is_tool_error(response: &Value) -> bool {
    response["result"]["is_error"].as_bool().unwrap_or(false)
}
