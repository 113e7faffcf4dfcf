//! Terminal progress output (`-v`)

use colored::Colorize;
use yargen_core::port::{SubmitEvent, SubmitObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `[*]` step in progress
    Step,
    /// `[+]` step done
    Done,
    /// indented status line
    Status,
}

impl Marker {
    fn paint(self) -> String {
        match self {
            Marker::Step => "[*]".cyan().to_string(),
            Marker::Done => "[+]".green().to_string(),
            Marker::Status => "   ".to_string(),
        }
    }
}

/// Human-readable line for an event, without colors
pub fn render(event: &SubmitEvent) -> (Marker, String) {
    match event {
        SubmitEvent::CheckingServer { server_url } => {
            (Marker::Step, format!("Checking server at {} ...", server_url))
        }
        SubmitEvent::Submitting { file_name } => (Marker::Done, format!("Submitting: {}", file_name)),
        SubmitEvent::JobAccepted { job_id } => (Marker::Done, format!("Job ID: {}", job_id)),
        SubmitEvent::GenerationStarted { .. } => {
            (Marker::Step, "Rule generation started".to_string())
        }
        SubmitEvent::Waiting { max_wait } => (
            Marker::Step,
            format!("Waiting for generation (max {}s)...", max_wait.as_secs()),
        ),
        SubmitEvent::InitialStatus { status } | SubmitEvent::StatusChanged { to: status, .. } => {
            (Marker::Status, format!("Status: {}", status))
        }
        SubmitEvent::ArtifactReady { bytes } => {
            (Marker::Done, format!("Received rules ({} bytes)", bytes))
        }
    }
}

/// Prints progress to stderr when verbose, stays silent otherwise
pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl SubmitObserver for TerminalReporter {
    fn on_event(&self, event: &SubmitEvent) {
        if !self.verbose {
            return;
        }
        let (marker, text) = render(event);
        eprintln!("{} {}", marker.paint(), text);
    }
}
