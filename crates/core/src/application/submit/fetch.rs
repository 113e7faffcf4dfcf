// ResultFetcher - downloads the rules of a completed job

use crate::domain::Artifact;
use crate::error::{Result, Step, SubmitError};
use crate::port::SubmissionTransport;
use tracing::info;

pub struct ResultFetcher<'a> {
    transport: &'a dyn SubmissionTransport,
}

impl<'a> ResultFetcher<'a> {
    pub fn new(transport: &'a dyn SubmissionTransport) -> Self {
        Self { transport }
    }

    /// Only call once the poller has seen `completed`
    pub fn fetch(&self, job_id: &str) -> Result<Artifact> {
        let artifact = self
            .transport
            .fetch_artifact(job_id)
            .map_err(|e| SubmitError::from_transport(Step::Fetch, e))?;

        info!(job_id = %job_id, bytes = artifact.len(), "Rules retrieved");
        Ok(artifact)
    }
}
