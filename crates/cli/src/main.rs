//! yargen-util - command-line client for the yarGen server
//! Submits a sample, waits for rule generation and prints the rules

mod logging;
mod reporter;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use reporter::TerminalReporter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use yargen_core::application::constants::{DEFAULT_MAX_WAIT, DEFAULT_SERVER_URL};
use yargen_core::application::SubmitService;
use yargen_core::domain::DEFAULT_AUTHOR;
use yargen_core::port::SystemTimeProvider;
use yargen_core::{SubmitConfig, SubmitError, SubmitOptions, VERSION};
use yargen_infra_http::{HttpTransport, HttpTransportConfig};

#[derive(Parser)]
#[command(name = "yargen-util")]
#[command(about = "Utility for the yarGen rule generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit sample to yarGen server and get rules
    Submit(SubmitArgs),

    /// Show version
    Version,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Sample file to generate rules for
    sample: PathBuf,

    /// yarGen server URL
    #[arg(long, env = "YARGEN_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Author name
    #[arg(short, long, default_value = DEFAULT_AUTHOR)]
    author: String,

    /// Reference
    #[arg(short, long)]
    reference: Option<String>,

    /// Show scores as comments
    #[arg(long)]
    score: bool,

    /// Disable opcode analysis
    #[arg(long)]
    no_opcodes: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum wait time in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_WAIT.as_secs())]
    wait: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl SubmitArgs {
    fn config(&self) -> SubmitConfig {
        SubmitConfig::default()
            .with_server_url(self.server.clone())
            .with_author(self.author.clone())
            .with_max_wait(Duration::from_secs(self.wait))
    }

    fn options(&self) -> SubmitOptions {
        SubmitOptions {
            sample_path: self.sample.clone(),
            reference: self.reference.clone(),
            show_scores: self.score,
            exclude_opcodes: self.no_opcodes,
            output: self.output.clone(),
        }
    }
}

fn submit(args: &SubmitArgs) -> Result<()> {
    let transport = HttpTransport::new(HttpTransportConfig::new(&args.server))
        .context("Failed to set up HTTP client")?;

    let service = SubmitService::new(
        args.config(),
        Arc::new(transport),
        Arc::new(SystemTimeProvider::new()),
        Arc::new(TerminalReporter::new(args.verbose)),
    );

    let stdout = std::io::stdout();
    let report = service.submit(&args.options(), &mut stdout.lock())?;

    if let Some(path) = &report.output {
        println!("{} {}", "[+]".green(), saved_message(path));
    }
    Ok(())
}

fn saved_message(path: &Path) -> String {
    format!("Rules saved to: {}", path.display())
}

/// Error text after the `[E]` marker, plus an optional hint line.
///
/// Library errors already embed their cause in their own message, so a
/// cause is only appended when the text so far does not end with it.
fn describe_error(err: &anyhow::Error) -> (String, Option<&'static str>) {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
    }

    let hint = match err.downcast_ref::<SubmitError>() {
        Some(SubmitError::ServerUnreachable { .. }) => Some("Start with: yargen serve"),
        _ => None,
    };
    (message, hint)
}

fn report_error(err: &anyhow::Error) {
    if let Some(SubmitError::ServerUnreachable { reason, .. }) = err.downcast_ref::<SubmitError>() {
        tracing::debug!(reason = %reason, "Health check failed");
    }
    let (message, hint) = describe_error(err);
    eprintln!("{} {}", "[E]".red().bold(), message);
    if let Some(hint) = hint {
        eprintln!("    {}", hint);
    }
}

fn run(command: Commands) -> ExitCode {
    match command {
        Commands::Version => {
            println!("yargen-util version {}", VERSION);
            ExitCode::SUCCESS
        }
        Commands::Submit(args) => match submit(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_error(&e);
                ExitCode::FAILURE
            }
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("{} {:#}", "[E]".red().bold(), e);
    }

    run(cli.command)
}
