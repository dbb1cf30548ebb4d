// crates/retrieval-gate-cli/src/main.rs
// ============================================================================
// Module: Retrieval Gate CLI Entry Point
// Description: Command dispatcher for offline filter and re-validation workflows.
// Purpose: Exercise the access-control engine over JSON files from the shell.
// Dependencies: clap, retrieval-gate-core, retrieval-gate-config, serde, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `retrieval-gate` binary loads a user permission profile and raw
//! search hits from JSON files, then prints the query-time filter, the
//! re-validation result, or engine diagnostics as JSON on stdout. Inputs are
//! untrusted: every file read is size-bounded and every failure exits non-zero.
//!
//! Logging goes to stderr and is controlled by `RETRIEVAL_GATE_LOG`
//! (`warn` by default). Audit records are emitted on the
//! `retrieval_gate::audit` target at `info` level.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use retrieval_gate_config::RetrievalGateConfig;
use retrieval_gate_core::AccessControlEngine;
use retrieval_gate_core::AccessDecision;
use retrieval_gate_core::DocumentRecord;
use retrieval_gate_core::FilterExpression;
use retrieval_gate_core::TracingAuditSink;
use retrieval_gate_core::UserPermission;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV_VAR: &str = "RETRIEVAL_GATE_LOG";
/// Log filter used when the environment does not set one.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Maximum size of a JSON input file.
const MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;
/// Source object key inside a search hit.
const HIT_SOURCE: &str = "_source";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Retrieval Gate command-line interface.
#[derive(Parser, Debug)]
#[command(name = "retrieval-gate", version, about = "Permission-aware retrieval gate")]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the query-time filter for a user.
    Filter(FilterCommand),
    /// Re-validate search hits for a user.
    Evaluate(EvaluateCommand),
    /// Print engine diagnostics for the loaded configuration.
    Stats(StatsCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Options shared by commands that build an engine.
#[derive(Args, Debug)]
struct EngineArgs {
    /// Optional config file path (defaults to retrieval-gate.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Evaluation instant (RFC 3339); defaults to now.
    #[arg(long, value_name = "RFC3339")]
    at: Option<String>,
}

/// Arguments for `filter`.
#[derive(Args, Debug)]
struct FilterCommand {
    /// User permission JSON file.
    #[arg(long, value_name = "PATH")]
    user: PathBuf,
    /// Optional JSON array of hits to test against the generated filter.
    #[arg(long, value_name = "PATH")]
    check: Option<PathBuf>,
    /// Shared engine options.
    #[command(flatten)]
    engine: EngineArgs,
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// User permission JSON file.
    #[arg(long, value_name = "PATH")]
    user: PathBuf,
    /// JSON array of search hits or raw source objects.
    #[arg(long, value_name = "PATH")]
    documents: PathBuf,
    /// Shared engine options.
    #[command(flatten)]
    engine: EngineArgs,
}

/// Arguments for `stats`.
#[derive(Args, Debug)]
struct StatsCommand {
    /// Shared engine options.
    #[command(flatten)]
    engine: EngineArgs,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to retrieval-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Filter-check outcome for one hit.
#[derive(Debug, Serialize)]
struct FilterCheck {
    /// Document identifier, or `unknown`.
    resource: String,
    /// Whether the generated filter admits the hit.
    matches: bool,
}

/// Output of `filter`.
#[derive(Debug, Serialize)]
struct FilterReport {
    /// Generated filter tree.
    filter: FilterExpression,
    /// Per-hit results when `--check` is given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checks: Vec<FilterCheck>,
}

/// Output of `evaluate`.
#[derive(Debug, Serialize)]
struct EvaluateReport {
    /// Hits that survived re-validation, unchanged.
    allowed: Vec<Value>,
    /// Number of rejected hits.
    denied: usize,
    /// One decision per input hit, in input order.
    decisions: Vec<AccessDecision>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Filter(command) => command_filter(&command),
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Stats(command) => command_stats(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ =
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `filter`.
fn command_filter(command: &FilterCommand) -> CliResult<ExitCode> {
    let engine = load_engine(command.engine.config.as_deref())?;
    let now = parse_instant(command.engine.at.as_deref())?;
    let user: UserPermission = read_json(&command.user, "user")?;
    let filter = engine.generate_filter_at(&user, now);

    let checks = match &command.check {
        Some(path) => {
            let hits: Vec<Value> = read_json(path, "hits")?;
            check_hits(&filter, &hits)
        }
        None => Vec::new(),
    };
    write_json(&FilterReport {
        filter,
        checks,
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `evaluate`.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let engine = load_engine(command.engine.config.as_deref())?;
    let now = parse_instant(command.engine.at.as_deref())?;
    let user: UserPermission = read_json(&command.user, "user")?;
    let hits: Vec<Value> = read_json(&command.documents, "documents")?;
    let batch = engine.filter_search_hits(hits, &user, now);
    let denied = batch.denied_count();
    tracing::debug!(allowed = batch.allowed.len(), denied, "re-validated search hits");
    write_json(&EvaluateReport {
        allowed: batch.allowed,
        denied,
        decisions: batch.audit,
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `stats`.
fn command_stats(command: &StatsCommand) -> CliResult<ExitCode> {
    let engine = load_engine(command.engine.config.as_deref())?;
    let now = parse_instant(command.engine.at.as_deref())?;
    write_json(&engine.statistics_at(now))?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = RetrievalGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config validation failed: {err}")))?;
    config
        .policy_settings()
        .map_err(|err| CliError::new(format!("config validation failed: {err}")))?;
    write_stdout_line("config valid").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration and builds an engine that audits through tracing.
fn load_engine(path: Option<&Path>) -> CliResult<AccessControlEngine> {
    let config = RetrievalGateConfig::load_or_default(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    config
        .build_engine(Arc::new(TracingAuditSink))
        .map_err(|err| CliError::new(format!("failed to build engine: {err}")))
}

/// Parses `--at`, defaulting to the current instant.
fn parse_instant(raw: Option<&str>) -> CliResult<OffsetDateTime> {
    raw.map_or_else(
        || Ok(OffsetDateTime::now_utc()),
        |value| {
            OffsetDateTime::parse(value, &Rfc3339)
                .map_err(|err| CliError::new(format!("invalid --at timestamp {value}: {err}")))
        },
    )
}

/// Tests each hit against a generated filter.
fn check_hits(filter: &FilterExpression, hits: &[Value]) -> Vec<FilterCheck> {
    hits.iter()
        .map(|hit| {
            let source = hit.get(HIT_SOURCE).filter(|value| value.is_object()).unwrap_or(hit);
            FilterCheck {
                resource: DocumentRecord::from_source(source).audit_resource().to_string(),
                matches: filter.matches(source),
            }
        })
        .collect()
}

/// Reads and decodes a bounded JSON input file.
fn read_json<T: DeserializeOwned>(path: &Path, kind: &str) -> CliResult<T> {
    let display = path.display();
    let bytes = read_bytes_with_limit(path, MAX_INPUT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!("failed to read {kind} {display}: {err}")),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{kind} file {display} is too large ({size} bytes, limit {limit})"
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("invalid {kind} json in {display}: {err}")))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Serializes a value as pretty JSON on stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render json: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
