use serde::{Deserialize, Serialize};

use crate::jira::{self, StageOutput};

/// Conversion request as received from a caller.
///
/// The Markdown may arrive under either `markdown` or `text`; `markdown` wins
/// when both are set. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ConvertRequest {
    pub fn from_markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: Some(markdown.into()),
            text: None,
        }
    }

    /// The Markdown to convert, if the request carries any.
    pub fn source(&self) -> Option<&str> {
        [&self.markdown, &self.text]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

/// Conversion result, serialized as `{ "jira": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOutput {
    pub jira: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Markdown text is required")]
    MissingMarkdown,
}

/// Convert the Markdown carried by `request`.
pub fn transform_request(request: &ConvertRequest) -> Result<ConvertOutput, RequestError> {
    transform_request_with(request, |_| {})
}

/// [`transform_request`], reporting every conversion stage to `observer`.
pub fn transform_request_with<F>(
    request: &ConvertRequest,
    observer: F,
) -> Result<ConvertOutput, RequestError>
where
    F: FnMut(StageOutput<'_>),
{
    let markdown = request.source().ok_or(RequestError::MissingMarkdown)?;

    Ok(ConvertOutput {
        jira: jira::convert_with(markdown, observer),
    })
}
