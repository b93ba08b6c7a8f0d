//! Infrastructure layer
//!
//! Handles all I/O operations: reading binaries, finding tools on `PATH`
//! and running them. This module is the only place where side effects occur.

pub mod inspect;
pub mod process;
pub mod tools;
