//! debugsplit - split debug information out of ELF binaries
//!
//! Moves the DWARF sections of linked binaries into a store keyed by GNU
//! build-id, strips the binaries and links them back to their debug files
//! with `.gnu_debuglink`, the way distribution packaging does.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Classification, the split pipeline and batch runs
//! - [`infra`] - Infrastructure layer (ELF reading, tool lookup, processes)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
