// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod submit;

// Re-exports
pub use submit::{SubmitReport, SubmitService};
