use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, UpdateError>;

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("registry unavailable at {url}: {reason}")]
    RegistryUnavailable { url: String, reason: String },

    #[error("malformed registry response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("download of {url} to {} failed: {reason}", path.display())]
    DownloadFailed {
        url: String,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    #[error("config error at {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to read user input: {0}")]
    Prompt(#[from] std::io::Error),
}

impl UpdateError {
    /// Process exit status reported for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            UpdateError::RegistryUnavailable { .. } => 2,
            UpdateError::MalformedResponse { .. } => 3,
            UpdateError::DownloadFailed { .. } => 4,
            UpdateError::ExtractionFailed { .. } => 5,
            UpdateError::Config { .. } => 6,
            UpdateError::Prompt(_) => 7,
        }
    }

    pub(crate) fn registry(url: &str, reason: impl ToString) -> Self {
        UpdateError::RegistryUnavailable {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl ToString) -> Self {
        UpdateError::MalformedResponse {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}
