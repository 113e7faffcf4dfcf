// Submission Transport Port
// Abstraction over the yarGen service HTTP API

use crate::domain::{Artifact, GenerationRequest, Job};
use std::fs::File;
use thiserror::Error;

/// Raw upload acknowledgement; the id may be empty if the service misbehaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub id: String,
}

/// Transport errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, reset
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status; `status_line` is e.g. "500 Internal Server Error"
    #[error("{status_line}")]
    Status { code: u16, status_line: String },

    /// Response body was not the JSON the endpoint promises
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Submission Transport trait
///
/// Every call blocks until the service answers or the network fails, and
/// none of them retries internally.
///
/// Implementations:
/// - HttpTransport (yargen-infra-http): blocking reqwest client
/// - ScriptedTransport: canned responses for tests
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionTransport: Send + Sync {
    /// Liveness probe. Any HTTP response counts as reachable; only a
    /// network-level failure is an error.
    fn health_check(&self) -> Result<(), TransportError>;

    /// Stream `file` as the multipart field `file`, named `file_name`.
    /// The handle is consumed and dropped before this returns.
    fn upload(&self, file_name: &str, file: File) -> Result<UploadReceipt, TransportError>;

    /// Ask the service to start generating rules for an uploaded sample
    fn start_generation(&self, request: &GenerationRequest) -> Result<(), TransportError>;

    /// Current status of a job
    fn job_status(&self, job_id: &str) -> Result<Job, TransportError>;

    /// Generated rules of a completed job
    fn fetch_artifact(&self, job_id: &str) -> Result<Artifact, TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::JobStatus;
    use crate::port::time_provider::mocks::FakeClock;
    use crate::port::TimeProvider;
    use std::collections::VecDeque;
    use std::io::Read;
    use std::sync::{Arc, Mutex};

    /// A call observed by the scripted transport
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Health,
        Upload { file_name: String, content: Vec<u8> },
        Generate(GenerationRequest),
        Status { job_id: String, at_millis: i64 },
        Fetch { job_id: String },
    }

    struct Script {
        health: Result<(), TransportError>,
        upload: Result<UploadReceipt, TransportError>,
        generate: Result<(), TransportError>,
        statuses: VecDeque<Result<Job, TransportError>>,
        last_status: Option<Result<Job, TransportError>>,
        artifact: Result<Artifact, TransportError>,
    }

    /// Transport that replays canned responses and records every call.
    ///
    /// Status responses are consumed in order; once the script runs dry the
    /// last one repeats forever, which models a job stuck in one state.
    pub struct ScriptedTransport {
        script: Mutex<Script>,
        calls: Mutex<Vec<Call>>,
        clock: Option<Arc<FakeClock>>,
    }

    impl ScriptedTransport {
        /// Happy path: upload yields `job_id`, then each status in turn
        pub fn new(job_id: &str, statuses: &[&str]) -> Self {
            let statuses = statuses
                .iter()
                .map(|s| Ok(Job::new(job_id, JobStatus::from(*s))))
                .collect();
            Self {
                script: Mutex::new(Script {
                    health: Ok(()),
                    upload: Ok(UploadReceipt {
                        id: job_id.to_string(),
                    }),
                    generate: Ok(()),
                    statuses,
                    last_status: None,
                    artifact: Ok(Artifact::new(Vec::new())),
                }),
                calls: Mutex::new(Vec::new()),
                clock: None,
            }
        }

        /// Stamp status queries with the fake clock's current time
        pub fn with_clock(mut self, clock: Arc<FakeClock>) -> Self {
            self.clock = Some(clock);
            self
        }

        pub fn with_health(self, result: Result<(), TransportError>) -> Self {
            self.script.lock().unwrap().health = result;
            self
        }

        pub fn with_upload(self, result: Result<UploadReceipt, TransportError>) -> Self {
            self.script.lock().unwrap().upload = result;
            self
        }

        pub fn with_generate(self, result: Result<(), TransportError>) -> Self {
            self.script.lock().unwrap().generate = result;
            self
        }

        /// Replace the status script with explicit responses
        pub fn with_statuses(self, statuses: Vec<Result<Job, TransportError>>) -> Self {
            self.script.lock().unwrap().statuses = statuses.into();
            self
        }

        pub fn with_artifact(self, result: Result<Artifact, TransportError>) -> Self {
            self.script.lock().unwrap().artifact = result;
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Virtual times at which status was queried
        pub fn status_query_times(&self) -> Vec<i64> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Status { at_millis, .. } => Some(at_millis),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl SubmissionTransport for ScriptedTransport {
        fn health_check(&self) -> Result<(), TransportError> {
            self.record(Call::Health);
            self.script.lock().unwrap().health.clone()
        }

        fn upload(&self, file_name: &str, mut file: File) -> Result<UploadReceipt, TransportError> {
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .map_err(|e| TransportError::Io(e.to_string()))?;
            self.record(Call::Upload {
                file_name: file_name.to_string(),
                content,
            });
            self.script.lock().unwrap().upload.clone()
        }

        fn start_generation(&self, request: &GenerationRequest) -> Result<(), TransportError> {
            self.record(Call::Generate(request.clone()));
            self.script.lock().unwrap().generate.clone()
        }

        fn job_status(&self, job_id: &str) -> Result<Job, TransportError> {
            let at_millis = self.clock.as_ref().map(|c| c.now_millis()).unwrap_or(0);
            self.record(Call::Status {
                job_id: job_id.to_string(),
                at_millis,
            });

            let mut script = self.script.lock().unwrap();
            match script.statuses.pop_front() {
                Some(next) => {
                    script.last_status = Some(next.clone());
                    next
                }
                None => script
                    .last_status
                    .clone()
                    .unwrap_or_else(|| Ok(Job::new(job_id, JobStatus::Running))),
            }
        }

        fn fetch_artifact(&self, job_id: &str) -> Result<Artifact, TransportError> {
            self.record(Call::Fetch {
                job_id: job_id.to_string(),
            });
            self.script.lock().unwrap().artifact.clone()
        }
    }
}
