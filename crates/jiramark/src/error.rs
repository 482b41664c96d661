use jiramark_core::request::RequestError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(std::io::Error),
}
