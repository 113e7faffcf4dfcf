// Submit Service - drives one sample from upload to generated rules

pub mod fetch;
pub mod launch;
pub mod poller;
pub mod sink;
pub mod upload;

#[cfg(test)]
mod submit_test;

pub use fetch::ResultFetcher;
pub use launch::JobLauncher;
pub use poller::{JobPoller, PollState};
pub use sink::{ArtifactSink, FileSink, WriterSink};
pub use upload::{sample_file_name, verify_sample, Uploader};

use crate::config::{SubmitConfig, SubmitOptions};
use crate::domain::{GenerationRequest, JobId};
use crate::error::{Result, SubmitError};
use crate::port::{SubmissionTransport, SubmitEvent, SubmitObserver, TimeProvider};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// What a successful submission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub job_id: JobId,
    pub bytes: usize,
    /// File the rules were saved to; `None` when they went to the stream
    pub output: Option<PathBuf>,
}

/// Submit Service
///
/// Sequence: verify sample -> health check -> upload -> launch -> poll ->
/// fetch -> deliver. The first failing step aborts the run; no step is
/// retried and earlier steps are never repeated.
pub struct SubmitService {
    config: SubmitConfig,
    transport: Arc<dyn SubmissionTransport>,
    time_provider: Arc<dyn TimeProvider>,
    observer: Arc<dyn SubmitObserver>,
}

impl SubmitService {
    pub fn new(
        config: SubmitConfig,
        transport: Arc<dyn SubmissionTransport>,
        time_provider: Arc<dyn TimeProvider>,
        observer: Arc<dyn SubmitObserver>,
    ) -> Self {
        Self {
            config,
            transport,
            time_provider,
            observer,
        }
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Run a full submission. Rules go to `options.output` when set,
    /// otherwise to `stream`.
    pub fn submit(&self, options: &SubmitOptions, stream: &mut dyn Write) -> Result<SubmitReport> {
        let result = self.run(options, stream);
        if let Err(e) = &result {
            warn!(error = %e, job_id = ?e.job_id(), "Submission aborted");
        }
        result
    }

    fn run(&self, options: &SubmitOptions, stream: &mut dyn Write) -> Result<SubmitReport> {
        let transport = self.transport.as_ref();

        // 1. Local file first: no network traffic for a bad path
        verify_sample(&options.sample_path)?;

        // 2. Liveness only; any HTTP answer will do
        self.emit(SubmitEvent::CheckingServer {
            server_url: self.config.server_url.clone(),
        });
        transport
            .health_check()
            .map_err(|e| SubmitError::ServerUnreachable {
                url: self.config.server_url.clone(),
                reason: e.to_string(),
            })?;

        // 3. Upload
        self.emit(SubmitEvent::Submitting {
            file_name: sample_file_name(&options.sample_path),
        });
        let job_id = Uploader::new(transport).upload(&options.sample_path)?;
        self.emit(SubmitEvent::JobAccepted {
            job_id: job_id.clone(),
        });

        // 4. Launch
        let request = GenerationRequest::new(job_id.clone(), self.config.author.clone())
            .with_reference(options.reference.clone())
            .with_show_scores(options.show_scores)
            .with_exclude_opcodes(options.exclude_opcodes);
        JobLauncher::new(transport).launch(&request)?;
        self.emit(SubmitEvent::GenerationStarted {
            job_id: job_id.clone(),
        });

        // 5. Poll
        self.emit(SubmitEvent::Waiting {
            max_wait: self.config.max_wait,
        });
        JobPoller::new(
            transport,
            self.time_provider.as_ref(),
            self.observer.as_ref(),
            self.config.poll_interval,
            self.config.max_wait,
        )
        .wait_for_completion(&job_id)?;

        // 6. Fetch
        let artifact = ResultFetcher::new(transport).fetch(&job_id)?;
        self.emit(SubmitEvent::ArtifactReady {
            bytes: artifact.len(),
        });

        // 7. Deliver
        match &options.output {
            Some(path) => FileSink::new(path).deliver(&artifact)?,
            None => WriterSink::new(&mut *stream).deliver(&artifact)?,
        }

        info!(
            job_id = %job_id,
            bytes = artifact.len(),
            output = ?options.output,
            "Submission complete"
        );

        Ok(SubmitReport {
            job_id,
            bytes: artifact.len(),
            output: options.output.clone(),
        })
    }

    fn emit(&self, event: SubmitEvent) {
        self.observer.on_event(&event);
    }
}
