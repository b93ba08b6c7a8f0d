//! Error types for debugsplit
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Debug splitting errors
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Required host tool could not be located
    #[error(
        "Required tool '{tool}' not found on host. \
         Install binutils (or the cross binutils for your target)"
    )]
    ToolNotFound { tool: String },

    /// External tool exited with a nonzero status
    #[error("Failed to split debug info: command '{command}' exited with code {code}")]
    ToolFailed { command: String, code: i32 },

    /// External tool was terminated by a signal
    #[error("Failed to split debug info: command '{command}' was terminated by a signal")]
    ToolTerminated { command: String },

    /// External tool could not be started
    #[error("Failed to run '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Build-id cannot be mapped onto the debug store layout
    #[error("Invalid build-id '{build_id}': expected at least 3 hex characters")]
    InvalidBuildId { build_id: String },

    /// Failed to create a debug store directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },
}

/// ELF inspection errors
#[derive(Error, Debug)]
pub enum InspectError {
    /// File could not be read
    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// File is not an ELF object
    #[error("'{path}' is not an ELF file")]
    NotElf { path: PathBuf },

    /// ELF headers could not be parsed
    #[error("Failed to parse ELF file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// A setting has an unusable value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
