//! Core business logic module
//!
//! This module contains the splitting logic for debugsplit. Subprocesses and
//! ELF parsing sit behind the traits in [`crate::infra`] and [`elf`].
//!
//! # Submodules
//!
//! - [`elf`] - ELF facts the splitter works from
//! - [`classify`] - Split eligibility
//! - [`store`] - Build-id keyed debug store layout
//! - [`splitter`] - The extract, strip and link pipeline
//! - [`batch`] - Splitting many binaries in parallel
//! - [`config`] - `debugsplit.toml` handling
//! - [`doctor`] - Tool availability checks

pub mod batch;
pub mod classify;
pub mod config;
pub mod doctor;
pub mod elf;
pub mod splitter;
pub mod store;
