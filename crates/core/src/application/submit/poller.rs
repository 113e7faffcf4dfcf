// JobPoller - fixed-interval status polling with a monotonic deadline

use crate::domain::{Job, JobStatus};
use crate::error::{Result, Step, SubmitError};
use crate::port::{SubmissionTransport, SubmitEvent, SubmitObserver, TimeProvider};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a job stands from the client's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Any non-terminal status, including ones the client does not know
    Running,
    Completed,
    Failed { message: Option<String> },
    /// Deadline passed before a terminal status was seen
    TimedOut,
}

impl PollState {
    pub fn from_job(job: &Job) -> Self {
        match job.status {
            JobStatus::Completed => PollState::Completed,
            JobStatus::Failed => PollState::Failed {
                message: job.failure_message().map(str::to_string),
            },
            _ => PollState::Running,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Running)
    }
}

pub struct JobPoller<'a> {
    transport: &'a dyn SubmissionTransport,
    time_provider: &'a dyn TimeProvider,
    observer: &'a dyn SubmitObserver,
    interval: Duration,
    max_wait: Duration,
}

impl<'a> JobPoller<'a> {
    pub fn new(
        transport: &'a dyn SubmissionTransport,
        time_provider: &'a dyn TimeProvider,
        observer: &'a dyn SubmitObserver,
        interval: Duration,
        max_wait: Duration,
    ) -> Self {
        Self {
            transport,
            time_provider,
            observer,
            interval,
            max_wait,
        }
    }

    /// Query status until a terminal state or the deadline.
    ///
    /// The first query goes out immediately; later ones follow at exactly
    /// `interval`. The deadline is checked before each query. Returns
    /// `Completed`, `Failed` or `TimedOut`, never `Running`.
    pub fn poll(&self, job_id: &str) -> Result<PollState> {
        let started_at = self.time_provider.now_millis();
        // Saturates: an enormous wait never turns into a negative deadline
        let max_wait_ms = i64::try_from(self.max_wait.as_millis()).unwrap_or(i64::MAX);
        let mut last_status: Option<JobStatus> = None;

        while self.time_provider.now_millis() - started_at < max_wait_ms {
            let job = self
                .transport
                .job_status(job_id)
                .map_err(|e| SubmitError::from_transport(Step::Poll, e))?;

            debug!(
                job_id = %job_id,
                status = %job.status,
                elapsed_ms = self.time_provider.now_millis() - started_at,
                "Job status polled"
            );

            match last_status.as_ref() {
                None => self.observer.on_event(&SubmitEvent::InitialStatus {
                    status: job.status.clone(),
                }),
                Some(prev) if *prev != job.status => {
                    self.observer.on_event(&SubmitEvent::StatusChanged {
                        from: prev.clone(),
                        to: job.status.clone(),
                    })
                }
                Some(_) => {}
            }
            last_status = Some(job.status.clone());

            let state = PollState::from_job(&job);
            if state.is_terminal() {
                info!(job_id = %job_id, status = %job.status, "Job reached terminal state");
                return Ok(state);
            }

            self.time_provider.sleep(self.interval);
        }

        warn!(
            job_id = %job_id,
            max_wait_secs = self.max_wait.as_secs(),
            last_status = ?last_status,
            "Gave up waiting for job"
        );
        Ok(PollState::TimedOut)
    }

    /// Poll and turn every non-`Completed` outcome into its error
    pub fn wait_for_completion(&self, job_id: &str) -> Result<()> {
        match self.poll(job_id)? {
            PollState::Completed => Ok(()),
            PollState::Failed { message } => Err(SubmitError::JobFailed {
                job_id: job_id.to_string(),
                message,
            }),
            PollState::TimedOut | PollState::Running => Err(SubmitError::Timeout {
                job_id: job_id.to_string(),
                max_wait_secs: self.max_wait.as_secs(),
            }),
        }
    }
}
