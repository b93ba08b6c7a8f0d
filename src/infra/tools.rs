//! Host tool resolution
//!
//! Locates `objcopy` and `strip` on the host, prefixed with the target
//! triplet when cross-compiling (e.g. `arm-linux-gnueabihf-objcopy`).
//! Resolution happens once, when the splitter is built.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::defaults::{OBJCOPY_TOOL, STRIP_TOOL};
use crate::error::SplitterError;
use crate::infra::process::is_executable_file;

/// Get the tool name for an architecture (e.g. `aarch64-linux-gnu-strip`)
pub fn command_for_arch(tool: &str, arch_triplet: Option<&str>) -> String {
    match arch_triplet {
        Some(triplet) if !triplet.is_empty() => format!("{triplet}-{tool}"),
        _ => tool.to_string(),
    }
}

/// Finds host executables
pub trait ToolResolver {
    /// Resolve `tool`, prefixed by `arch_triplet` if given, to an executable path
    fn resolve(&self, tool: &str, arch_triplet: Option<&str>) -> Result<PathBuf, SplitterError>;
}

/// Resolves tools through `PATH`, or through an explicit search path
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    /// Resolve through the process `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve through `search_path` (colon separated) instead of `PATH`
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolResolver for PathResolver {
    fn resolve(&self, tool: &str, arch_triplet: Option<&str>) -> Result<PathBuf, SplitterError> {
        let name = command_for_arch(tool, arch_triplet);
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(&name, Some(paths), cwd)
            }
            None => which::which(&name),
        };

        found.map_err(|_| SplitterError::ToolNotFound { tool: name })
    }
}

/// The binutils used for splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTools {
    objcopy: PathBuf,
    strip: PathBuf,
}

impl HostTools {
    /// Resolve `objcopy` and `strip` for `arch_triplet`
    pub fn resolve(
        resolver: &impl ToolResolver,
        arch_triplet: Option<&str>,
    ) -> Result<Self, SplitterError> {
        let objcopy = resolver.resolve(OBJCOPY_TOOL, arch_triplet)?;
        let strip = resolver.resolve(STRIP_TOOL, arch_triplet)?;
        tracing::debug!(
            "Using objcopy at {} and strip at {}",
            objcopy.display(),
            strip.display()
        );
        Ok(Self { objcopy, strip })
    }

    /// Use explicit tool paths. Both must exist and be executable.
    pub fn from_paths(
        objcopy: impl Into<PathBuf>,
        strip: impl Into<PathBuf>,
    ) -> Result<Self, SplitterError> {
        let objcopy = objcopy.into();
        let strip = strip.into();
        for tool in [&objcopy, &strip] {
            if !is_executable_file(tool) {
                return Err(SplitterError::ToolNotFound {
                    tool: tool.display().to_string(),
                });
            }
        }
        Ok(Self { objcopy, strip })
    }

    /// Use tool paths as given, without checking them
    pub fn unchecked(objcopy: impl Into<PathBuf>, strip: impl Into<PathBuf>) -> Self {
        Self {
            objcopy: objcopy.into(),
            strip: strip.into(),
        }
    }

    /// Path to objcopy
    pub fn objcopy(&self) -> &Path {
        &self.objcopy
    }

    /// Path to strip
    pub fn strip(&self) -> &Path {
        &self.strip
    }
}
