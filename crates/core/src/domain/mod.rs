// Domain Layer - Jobs as the client observes them

pub mod generation;
pub mod job;

// Re-exports
pub use generation::{Artifact, GenerationRequest, DEFAULT_AUTHOR};
pub use job::{Job, JobId, JobStatus};
