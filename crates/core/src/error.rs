// Central Error Type for the submission flow

use crate::domain::JobId;
use crate::port::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a submission can end without an artifact
///
/// Each variant aborts the sequence; nothing is retried.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("yarGen server not running at {url}")]
    ServerUnreachable { url: String, reason: String },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Failed to start generation: {0}")]
    GenerationStart(String),

    #[error(
        "Generation failed{}",
        .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    JobFailed { job_id: JobId, message: Option<String> },

    #[error("Timeout after {max_wait_secs} seconds (job: {job_id})")]
    Timeout { job_id: JobId, max_wait_secs: u64 },

    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to fetch rules: {0}")]
    Fetch(String),

    #[error("Failed to write output to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SubmitError
pub type Result<T> = std::result::Result<T, SubmitError>;

/// Submission step a transport failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Generate,
    Poll,
    Fetch,
}

impl SubmitError {
    /// Map an adapter failure onto the taxonomy of the step that hit it.
    /// Malformed JSON is always `Decode`, whatever the step.
    pub fn from_transport(step: Step, err: TransportError) -> Self {
        let msg = match err {
            TransportError::Decode(msg) => return SubmitError::Decode(msg),
            other => other.to_string(),
        };
        match step {
            Step::Upload => SubmitError::Upload(msg),
            Step::Generate => SubmitError::GenerationStart(msg),
            Step::Poll => SubmitError::Transport(msg),
            Step::Fetch => SubmitError::Fetch(msg),
        }
    }

    /// Job the error refers to, when the service had already accepted one
    pub fn job_id(&self) -> Option<&str> {
        match self {
            SubmitError::JobFailed { job_id, .. } | SubmitError::Timeout { job_id, .. } => {
                Some(job_id.as_str())
            }
            _ => None,
        }
    }
}
