//! Wire types, one per endpoint
//!
//! Mirrors the JSON the yarGen server speaks.

use serde::{Deserialize, Serialize};
use yargen_core::domain::{GenerationRequest, Job, JobStatus};

/// `POST /api/upload` response
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Missing ids decode as empty and are rejected by the uploader
    #[serde(default)]
    pub id: String,
}

/// `POST /api/generate` body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBody<'a> {
    pub job_id: &'a str,
    pub author: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<&'a str>,
    pub show_scores: bool,
    pub exclude_opcodes: bool,
}

impl<'a> From<&'a GenerationRequest> for GenerateBody<'a> {
    fn from(req: &'a GenerationRequest) -> Self {
        Self {
            job_id: &req.job_id,
            author: &req.author,
            reference: req.reference.as_deref().filter(|r| !r.is_empty()),
            show_scores: req.show_scores,
            exclude_opcodes: req.exclude_opcodes,
        }
    }
}

/// `GET /api/jobs/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatusResponse {
    pub fn into_job(self, job_id: &str) -> Job {
        Job {
            id: job_id.to_string(),
            status: self.status,
            error: self.error,
        }
    }
}
