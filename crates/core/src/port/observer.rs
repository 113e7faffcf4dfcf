// Submit Observer Port
// Progress reporting; never influences control flow

use crate::domain::JobStatus;
use std::time::Duration;

/// Progress of one submission, in the order the orchestrator emits it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEvent {
    CheckingServer { server_url: String },
    Submitting { file_name: String },
    JobAccepted { job_id: String },
    GenerationStarted { job_id: String },
    Waiting { max_wait: Duration },
    /// First status seen for the job (not a transition)
    InitialStatus { status: JobStatus },
    /// Status differs from the previous observation
    StatusChanged { from: JobStatus, to: JobStatus },
    ArtifactReady { bytes: usize },
}

pub trait SubmitObserver: Send + Sync {
    fn on_event(&self, event: &SubmitEvent);
}

/// Observer that drops everything
pub struct NoopObserver;

impl SubmitObserver for NoopObserver {
    fn on_event(&self, _event: &SubmitEvent) {}
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every event for later assertions
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<SubmitEvent>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SubmitEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn transitions(&self) -> Vec<(JobStatus, JobStatus)> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    SubmitEvent::StatusChanged { from, to } => Some((from, to)),
                    _ => None,
                })
                .collect()
        }
    }

    impl SubmitObserver for RecordingObserver {
        fn on_event(&self, event: &SubmitEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
