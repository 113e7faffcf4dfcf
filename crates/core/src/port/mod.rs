// Port Layer - Interfaces for external dependencies

pub mod observer;
pub mod time_provider; // For deterministic testing
pub mod transport;

// Re-exports
pub use observer::{NoopObserver, SubmitEvent, SubmitObserver};
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use transport::{SubmissionTransport, TransportError, UploadReceipt};
