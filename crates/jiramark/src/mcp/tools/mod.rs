mod convert;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

/// Name the Markdown converter is registered under.
pub const MD_TO_JIRA: &str = "md_to_jira";

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

fn to_value<T: Serialize>(value: T) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, format!("Internal error: {e}"))
    })
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    to_value(InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "jiramark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![Tool {
        name: MD_TO_JIRA.to_string(),
        description: "Convert GitHub-flavored Markdown to Jira wiki markup. Handles headings, bold, italic, strikethrough, links, images, nested lists, blockquotes, horizontal rules, tables, inline code and fenced code blocks; code contents are never rewritten. Returns a JSON object of the form {\"jira\": \"...\"}.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "markdown": {
                    "type": "string",
                    "description": "Markdown text to convert"
                },
                "text": {
                    "type": "string",
                    "description": "Alias for 'markdown', used when 'markdown' is absent or empty"
                }
            }
        }),
    }];

    to_value(ToolsList { tools })
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| {
            JsonRpcError::new(JsonRpcError::INVALID_PARAMS, format!("Invalid params: {e}"))
        })?;

    match params.name.as_str() {
        MD_TO_JIRA => convert::handle_md_to_jira(params.arguments, global).await,
        name => Err(JsonRpcError::new(
            JsonRpcError::INVALID_PARAMS,
            format!("Unknown tool: {name}"),
        )),
    }
}
