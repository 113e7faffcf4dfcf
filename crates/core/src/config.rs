// Submission configuration
// Defaults live in application::constants; nothing here is global state

use crate::application::constants::{
    DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL,
};
use crate::domain::DEFAULT_AUTHOR;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every submission against one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub server_url: String,
    pub author: String,
    /// Fixed delay between status queries
    pub poll_interval: Duration,
    /// Polling deadline, measured from the first status query
    pub max_wait: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl SubmitConfig {
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Per-invocation parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub sample_path: PathBuf,
    pub reference: Option<String>,
    pub show_scores: bool,
    pub exclude_opcodes: bool,
    /// `None` writes the rules to stdout
    pub output: Option<PathBuf>,
}

impl SubmitOptions {
    pub fn new(sample_path: impl Into<PathBuf>) -> Self {
        Self {
            sample_path: sample_path.into(),
            ..Default::default()
        }
    }
}
