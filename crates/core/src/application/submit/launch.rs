// JobLauncher - starts rule generation for an uploaded sample

use crate::domain::GenerationRequest;
use crate::error::{Result, Step, SubmitError};
use crate::port::SubmissionTransport;
use tracing::info;

pub struct JobLauncher<'a> {
    transport: &'a dyn SubmissionTransport,
}

impl<'a> JobLauncher<'a> {
    pub fn new(transport: &'a dyn SubmissionTransport) -> Self {
        Self { transport }
    }

    /// Post the request once; a rejected request is not re-sent
    pub fn launch(&self, request: &GenerationRequest) -> Result<()> {
        self.transport
            .start_generation(request)
            .map_err(|e| SubmitError::from_transport(Step::Generate, e))?;

        info!(
            job_id = %request.job_id,
            author = %request.author,
            show_scores = request.show_scores,
            exclude_opcodes = request.exclude_opcodes,
            "Rule generation started"
        );
        Ok(())
    }
}
