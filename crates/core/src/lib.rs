// yarGen Core - Submission state machine & Ports
// NO infrastructure dependencies (hexagonal layout)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::{SubmitConfig, SubmitOptions};
pub use error::{Result, SubmitError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
