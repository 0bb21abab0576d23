// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;
use serde_json::Value;

/// A single tool invocation dispatched by the MCP transport.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Opaque identifier supplied by the caller (forwarded verbatim).
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments.
    pub args: Value,
}

/// The result of executing a tool: always a JSON-encoded text payload, per
/// the tool dispatch contract (C9) — handler exceptions never escape as a
/// transport-level error, they become `is_error` results instead.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful result. `body` is serialized to a JSON text payload.
    pub fn ok(call_id: impl Into<String>, body: Value) -> Self {
        Self {
            call_id: call_id.into(),
            content: body.to_string(),
            is_error: false,
        }
    }

    /// Error result: `{"error": msg}`.
    pub fn err(call_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: serde_json::json!({ "error": msg.into() }).to_string(),
            is_error: true,
        }
    }
}

/// Trait every coordination tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for the tool's argument object.
    fn parameters_schema(&self) -> Value;
    /// Execute the tool. Must never panic on malformed input — return
    /// [`ToolOutput::err`] instead; the registry never lets an exception
    /// reach the transport.
    async fn execute(&self, call: &ToolCall) -> ToolOutput;
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its input"
        }
        fn parameters_schema(&self) -> Value {
            json!({ "type": "object" })
        }
        async fn execute(&self, call: &ToolCall) -> ToolOutput {
            ToolOutput::ok(&call.id, call.args.clone())
        }
    }

    #[tokio::test]
    async fn ok_output_is_not_an_error() {
        let call = ToolCall {
            id: "1".into(),
            name: "echo".into(),
            args: json!({"x": 1}),
        };
        let out = EchoTool.execute(&call).await;
        assert!(!out.is_error);
        assert_eq!(out.content, json!({"x": 1}).to_string());
    }

    #[test]
    fn err_output_wraps_message_as_json() {
        let out = ToolOutput::err("1", "boom");
        assert!(out.is_error);
        assert_eq!(out.content, json!({"error": "boom"}).to_string());
    }
}
