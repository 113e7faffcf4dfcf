// Generation request & Artifact

use super::job::JobId;

/// Default author written into generated rule metadata
pub const DEFAULT_AUTHOR: &str = "yarGen";

/// Parameters posted to start rule generation for an uploaded sample
///
/// Immutable once sent; the client never re-sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub job_id: JobId,
    pub author: String,
    pub reference: Option<String>,
    /// Annotate each string with its match score
    pub show_scores: bool,
    /// Skip opcode-based analysis on the server
    pub exclude_opcodes: bool,
}

impl GenerationRequest {
    pub fn new(job_id: impl Into<JobId>, author: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            author: author.into(),
            reference: None,
            show_scores: false,
            exclude_opcodes: false,
        }
    }

    /// Empty references are the same as no reference
    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference.filter(|r| !r.is_empty());
        self
    }

    pub fn with_show_scores(mut self, show_scores: bool) -> Self {
        self.show_scores = show_scores;
        self
    }

    pub fn with_exclude_opcodes(mut self, exclude_opcodes: bool) -> Self {
        self.exclude_opcodes = exclude_opcodes;
        self
    }
}

/// Generated rule set, kept as the exact bytes the service returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact(Vec<u8>);

impl Artifact {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}
