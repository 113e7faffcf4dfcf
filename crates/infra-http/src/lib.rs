// yarGen Infrastructure - HTTP Adapter
// Implements: SubmissionTransport

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpTransport, HttpTransportConfig};
pub use error::HttpTransportError;
