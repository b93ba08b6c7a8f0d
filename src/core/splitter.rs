//! Debug information splitting
//!
//! For every eligible binary the splitter runs three binutils steps, always
//! in this order:
//!
//! 1. `objcopy --only-keep-debug --compress-debug-sections` copies the debug
//!    sections into the debug store
//! 2. `strip` removes `.comment`, `.note` and, for shared objects, unneeded
//!    symbols from the binary in place
//! 3. `objcopy --add-gnu-debuglink` points the stripped binary at its debug file
//!
//! A failing step aborts the remaining ones. A debug file extracted before a
//! failed strip is left in place; re-running the split rewrites it with the
//! same content.

use std::path::{Path, PathBuf};

use crate::core::classify::classify;
use crate::core::elf::ElfFile;
use crate::core::store::DebugStore;
use crate::error::SplitterError;
use crate::infra::process::{CommandRunner, SystemRunner, ToolCommand};
use crate::infra::tools::HostTools;

/// How much to strip from a binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripPolicy {
    /// Keep the symbol table; drop only `.comment` and `.note`
    Executable,
    /// Also drop every symbol not needed for relocation
    SharedObject,
}

impl StripPolicy {
    /// Pick the policy from a binary's permission bits
    pub fn for_file(elf: &ElfFile) -> Self {
        if elf.is_executable() {
            Self::Executable
        } else {
            Self::SharedObject
        }
    }

    /// Flags passed to `strip`
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            Self::Executable => &["--remove-section=.comment", "--remove-section=.note"],
            Self::SharedObject => &[
                "--remove-section=.comment",
                "--remove-section=.note",
                "--strip-unneeded",
            ],
        }
    }
}

/// Splits debug information out of ELF binaries into a [`DebugStore`]
#[derive(Debug)]
pub struct DebugSplitter<R = SystemRunner> {
    tools: HostTools,
    store: DebugStore,
    runner: R,
}

impl DebugSplitter<SystemRunner> {
    /// Create a splitter that runs the real tools
    pub fn new(tools: HostTools, debug_dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(tools, debug_dir, SystemRunner)
    }
}

impl<R: CommandRunner> DebugSplitter<R> {
    /// Create a splitter with a custom command runner
    pub fn with_runner(tools: HostTools, debug_dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            tools,
            store: DebugStore::new(debug_dir),
            runner,
        }
    }

    /// The debug store written to
    pub fn store(&self) -> &DebugStore {
        &self.store
    }

    /// The command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Split debug information out of `elf`.
    ///
    /// Returns the path of the debug file, or `None` when the binary is not
    /// eligible. Skipped binaries are left untouched.
    pub fn split(&self, elf: &ElfFile) -> Result<Option<PathBuf>, SplitterError> {
        let classification = classify(elf);
        let build_id = match elf.build_id.as_deref() {
            Some(build_id) if classification.is_eligible() => build_id,
            _ => {
                classification.report(elf);
                return Ok(None);
            }
        };

        let debug_file = self.store.prepare(build_id)?;

        self.make_debug(&elf.path, &debug_file)?;
        self.strip_debug(elf)?;
        self.attach_debug(&elf.path, &debug_file)?;

        tracing::info!(
            "Split debug info for '{}' into '{}'",
            elf.path.display(),
            debug_file.display()
        );
        Ok(Some(debug_file))
    }

    fn make_debug(&self, binary: &Path, debug_file: &Path) -> Result<(), SplitterError> {
        let cmd = ToolCommand::new(self.tools.objcopy())
            .args(["--only-keep-debug", "--compress-debug-sections"])
            .arg(binary)
            .arg(debug_file);
        self.run(&cmd)
    }

    fn strip_debug(&self, elf: &ElfFile) -> Result<(), SplitterError> {
        let cmd = ToolCommand::new(self.tools.strip())
            .args(StripPolicy::for_file(elf).flags())
            .arg(&elf.path);
        self.run(&cmd)
    }

    fn attach_debug(&self, binary: &Path, debug_file: &Path) -> Result<(), SplitterError> {
        let cmd = ToolCommand::new(self.tools.objcopy())
            .arg("--add-gnu-debuglink")
            .arg(debug_file)
            .arg(binary);
        self.run(&cmd)
    }

    fn run(&self, cmd: &ToolCommand) -> Result<(), SplitterError> {
        tracing::debug!("running: {}", cmd.display());
        self.runner.run(cmd)
    }
}
