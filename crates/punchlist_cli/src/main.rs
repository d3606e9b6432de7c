//! Boundary executable for the punchlist record service.
//!
//! # Responsibility
//! - Validate client input before it reaches the data-access core.
//! - Drive the per-request resolver and serialize results as JSON.
//! - Map core errors onto client-class vs server-class exit codes.
//!
//! The core trusts this layer: text length is checked here, once, and the
//! resolver owns connection lifecycle on every path below.

use punchlist_core::{with_record_service, ConnectionPool, RecordId, RepoError};
use std::env;
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "punchlist.sqlite3";
const TEXT_MAX_CHARS: usize = 255;

/// Client-class failure (bad input, conflict, unknown record).
const EXIT_CLIENT: u8 = 2;
/// Server-class failure (store or connection trouble).
const EXIT_INTERNAL: u8 = 1;

struct CliError {
    code: u8,
    message: String,
}

impl CliError {
    fn client(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_CLIENT,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_INTERNAL,
            message: message.into(),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Integrity(_) => Self::client(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

fn main() -> ExitCode {
    init_logging_from_env();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("punchlist: {}", err.message);
            ExitCode::from(err.code)
        }
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    match args {
        [cmd, text] if cmd == "add" => add(text),
        [cmd] if cmd == "list" => list(),
        [cmd, id] if cmd == "get" => get(id),
        [cmd] if cmd == "ping" => {
            println!("{}", punchlist_core::ping());
            Ok(())
        }
        _ => Err(CliError::client(USAGE)),
    }
}

fn add(text: &str) -> Result<(), CliError> {
    validate_text(text)?;
    let pool = open_pool()?;
    let record = with_record_service(&pool, |service| service.create(text))?;
    print_json(&record)
}

fn list() -> Result<(), CliError> {
    let pool = open_pool()?;
    let records = with_record_service(&pool, |service| service.list())?;
    print_json(&records)
}

fn get(raw_id: &str) -> Result<(), CliError> {
    let id: RecordId = raw_id
        .parse()
        .map_err(|_| CliError::client(format!("`{raw_id}` is not a record id")))?;

    let pool = open_pool()?;
    match with_record_service(&pool, |service| service.get(id))? {
        Some(record) => print_json(&record),
        None => Err(CliError::client(format!("no such record: {id}"))),
    }
}

/// Boundary validation: the core does not re-validate text length.
fn validate_text(text: &str) -> Result<(), CliError> {
    let chars = text.chars().count();
    if chars == 0 {
        return Err(CliError::client("text must not be empty"));
    }
    if chars > TEXT_MAX_CHARS {
        return Err(CliError::client(format!(
            "text must be at most {TEXT_MAX_CHARS} characters (got {chars})"
        )));
    }
    Ok(())
}

fn open_pool() -> Result<ConnectionPool, CliError> {
    let path = env::var("PUNCHLIST_DB").unwrap_or_else(|_| DEFAULT_DB_FILE.to_string());
    ConnectionPool::open(&path)
        .map_err(|err| CliError::internal(format!("cannot open store at `{path}`: {err}")))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    let json = serde_json::to_string(value)
        .map_err(|err| CliError::internal(format!("cannot serialize response: {err}")))?;
    println!("{json}");
    Ok(())
}

/// Best-effort logging bootstrap; the CLI stays usable without a log dir.
fn init_logging_from_env() {
    let Ok(log_dir) = env::var("PUNCHLIST_LOG_DIR") else {
        return;
    };
    let level = env::var("PUNCHLIST_LOG_LEVEL")
        .unwrap_or_else(|_| punchlist_core::default_log_level().to_string());
    if let Err(message) = punchlist_core::init_logging(&level, &log_dir) {
        eprintln!("punchlist: logging disabled: {message}");
    }
}

const USAGE: &str = "usage: punchlist <add TEXT | list | get ID | ping>";
