use anyhow::Error;
use holdline_config::ConfigError;
use holdline_core::CoreError;
use holdline_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}

fn exit_status_for(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidDataPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::InvalidStoredValue
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::MissingPhoneHashSecret
        | ConfigError::InvalidBind(_)
        | ConfigError::InvalidPublicUrl(_)
        | ConfigError::InvalidGreeting { .. }
        | ConfigError::InvalidRecentCalls(_)
        | ConfigError::InvalidActiveWindow(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
