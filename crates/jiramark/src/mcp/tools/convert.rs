use jiramark_core::request::{transform_request, ConvertRequest};

use super::{to_value, CallToolResult, Content, JsonRpcError};

pub async fn handle_md_to_jira(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let request: ConvertRequest =
        serde_json::from_value(arguments.unwrap_or_else(|| serde_json::json!({}))).map_err(|e| {
            JsonRpcError::new(
                JsonRpcError::INVALID_PARAMS,
                format!("Invalid arguments: {e}"),
            )
        })?;

    if global.verbose {
        anstream::eprintln!(
            "Calling md_to_jira: {} bytes",
            request.source().map_or(0, str::len)
        );
    }

    let output = transform_request(&request)
        .map_err(|e| JsonRpcError::new(JsonRpcError::INVALID_PARAMS, e.to_string()))?;

    let json_string = serde_json::to_string_pretty(&output).map_err(|e| {
        JsonRpcError::new(
            JsonRpcError::INTERNAL_ERROR,
            format!("Serialization error: {e}"),
        )
    })?;

    to_value(CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> crate::Global {
        crate::Global { verbose: false }
    }

    fn payload(result: serde_json::Value) -> serde_json::Value {
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_markdown_argument() {
        let result = handle_md_to_jira(
            Some(serde_json::json!({ "markdown": "# Hello\n\n**Bold** text" })),
            &global(),
        )
        .await
        .unwrap();

        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(
            payload(result),
            serde_json::json!({ "jira": "h1. Hello\n\n*Bold* text" })
        );
    }

    #[tokio::test]
    async fn test_text_argument_alias() {
        let result = handle_md_to_jira(Some(serde_json::json!({ "text": "**bold**" })), &global())
            .await
            .unwrap();
        assert_eq!(payload(result), serde_json::json!({ "jira": "*bold*" }));
    }

    #[tokio::test]
    async fn test_complex_document() {
        let markdown = "## Summary\n- Item 1\n- Item 2\n\n```python\nprint(\"hello\")\n```";
        let result = handle_md_to_jira(Some(serde_json::json!({ "markdown": markdown })), &global())
            .await
            .unwrap();
        assert_eq!(
            payload(result)["jira"],
            "h2. Summary\n* Item 1\n* Item 2\n\n{code:python}\nprint(\"hello\")\n{code}"
        );
    }

    #[tokio::test]
    async fn test_missing_arguments() {
        let err = handle_md_to_jira(None, &global()).await.unwrap_err();
        assert_eq!(err.code, JsonRpcError::INVALID_PARAMS);
        assert_eq!(err.message, "Markdown text is required");
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let err = handle_md_to_jira(Some(serde_json::json!({ "markdown": 42 })), &global())
            .await
            .unwrap_err();
        assert_eq!(err.code, JsonRpcError::INVALID_PARAMS);
        assert!(err.message.starts_with("Invalid arguments"));
    }
}
