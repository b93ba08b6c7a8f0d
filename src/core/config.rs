//! Project configuration
//!
//! Reads optional settings from `debugsplit.toml`. Every value can be
//! overridden from the command line; anything left unset falls back to the
//! defaults in [`crate::config::defaults`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::{ConfigError, SplitterError};
use crate::infra::tools::{HostTools, ToolResolver};

/// Contents of `debugsplit.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Splitting settings
    #[serde(default)]
    pub split: SplitSection,

    /// Explicit tool paths
    #[serde(default)]
    pub tools: ToolsSection,
}

/// `[split]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSection {
    /// Target triplet used to prefix binutils names
    pub arch_triplet: Option<String>,

    /// Debug store directory
    pub debug_dir: Option<PathBuf>,

    /// Number of binaries split in parallel
    pub jobs: Option<usize>,
}

/// `[tools]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsSection {
    /// objcopy to use instead of looking one up
    pub objcopy: Option<PathBuf>,

    /// strip to use instead of looking one up
    pub strip: Option<PathBuf>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub arch_triplet: Option<String>,
    pub debug_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl SplitConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the default configuration. Relative paths in
    /// the file are resolved against the file's directory.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.split.jobs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "split.jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.split.arch_triplet.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "split.arch_triplet".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            self.split.debug_dir.as_mut(),
            self.tools.objcopy.as_mut(),
            self.tools.strip.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.arch_triplet.is_some() {
            self.split.arch_triplet = overrides.arch_triplet;
        }
        if overrides.debug_dir.is_some() {
            self.split.debug_dir = overrides.debug_dir;
        }
        if overrides.jobs.is_some() {
            self.split.jobs = overrides.jobs;
        }
        self
    }

    /// Get the effective target triplet
    pub fn arch_triplet(&self) -> Option<&str> {
        self.split.arch_triplet.as_deref()
    }

    /// Get the effective debug store directory
    pub fn debug_dir(&self) -> PathBuf {
        self.split
            .debug_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_DEBUG_DIR))
    }

    /// Get the effective number of parallel jobs
    pub fn jobs(&self) -> usize {
        self.split.jobs.unwrap_or_else(defaults::default_jobs).max(1)
    }

    /// Resolve the host tools this configuration asks for.
    ///
    /// Explicit `[tools]` paths win; anything not given is looked up through
    /// `resolver` with the configured triplet.
    pub fn host_tools(&self, resolver: &impl ToolResolver) -> Result<HostTools, SplitterError> {
        if self.tools.objcopy.is_none() && self.tools.strip.is_none() {
            return HostTools::resolve(resolver, self.arch_triplet());
        }

        let objcopy = match &self.tools.objcopy {
            Some(path) => path.clone(),
            None => resolver.resolve(defaults::OBJCOPY_TOOL, self.arch_triplet())?,
        };
        let strip = match &self.tools.strip {
            Some(path) => path.clone(),
            None => resolver.resolve(defaults::STRIP_TOOL, self.arch_triplet())?,
        };
        HostTools::from_paths(objcopy, strip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct MissingResolver;

    impl ToolResolver for MissingResolver {
        fn resolve(
            &self,
            tool: &str,
            arch_triplet: Option<&str>,
        ) -> Result<PathBuf, SplitterError> {
            Err(SplitterError::ToolNotFound {
                tool: crate::infra::tools::command_for_arch(tool, arch_triplet),
            })
        }
    }

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert!(config.arch_triplet().is_none());
        assert_eq!(config.debug_dir(), PathBuf::from("debug"));
        assert!(config.jobs() >= 1);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = SplitConfig::load_from_path(&temp_dir.path().join("debugsplit.toml")).unwrap();
        assert_eq!(config, SplitConfig::default());
    }

    #[test]
    fn test_load_valid_config_rebases_paths() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("debugsplit.toml");
        let content = r#"
[split]
arch_triplet = "arm-linux-gnueabihf"
debug_dir = "out/debug"
jobs = 2

[tools]
objcopy = "/opt/cross/bin/arm-objcopy"
strip = "bin/strip"
"#;
        fs::write(&config_path, content).unwrap();

        let config = SplitConfig::load_from_path(&config_path).unwrap();

        assert_eq!(config.arch_triplet(), Some("arm-linux-gnueabihf"));
        assert_eq!(config.debug_dir(), temp_dir.path().join("out/debug"));
        assert_eq!(config.jobs(), 2);
        assert_eq!(config.tools.objcopy, Some(PathBuf::from("/opt/cross/bin/arm-objcopy")));
        assert_eq!(config.tools.strip, Some(temp_dir.path().join("bin/strip")));
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("debugsplit.toml");
        fs::write(&config_path, "invalid toml [[[").unwrap();

        match SplitConfig::load_from_path(&config_path) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, config_path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let err = SplitConfig::from_toml("[split]\njobs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "split.jobs"));
    }

    #[test]
    fn test_empty_triplet_rejected() {
        assert!(SplitConfig::from_toml("[split]\narch_triplet = \"  \"\n").is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let content = "[split]\narch_triplet = \"aarch64-linux-gnu\"\njobs = 8\n";
        let config = SplitConfig::from_toml(content)
            .unwrap()
            .with_overrides(Overrides {
                arch_triplet: Some("arm-linux-gnueabihf".to_string()),
                debug_dir: Some(PathBuf::from("/tmp/dbg")),
                jobs: None,
            });

        assert_eq!(config.arch_triplet(), Some("arm-linux-gnueabihf"));
        assert_eq!(config.debug_dir(), PathBuf::from("/tmp/dbg"));
        assert_eq!(config.jobs(), 8);
    }

    #[test]
    fn test_host_tools_uses_triplet_when_resolving() {
        let config =
            SplitConfig::from_toml("[split]\narch_triplet = \"mips-linux-gnu\"\n").unwrap();
        let err = config.host_tools(&MissingResolver).unwrap_err();
        assert!(matches!(
            err,
            SplitterError::ToolNotFound { tool } if tool == "mips-linux-gnu-objcopy"
        ));
    }

    #[test]
    fn test_host_tools_explicit_paths_must_exist() {
        let config = SplitConfig::from_toml(
            "[tools]\nobjcopy = \"/nonexistent/objcopy\"\nstrip = \"/nonexistent/strip\"\n",
        )
        .unwrap();
        let err = config.host_tools(&MissingResolver).unwrap_err();
        assert!(matches!(
            err,
            SplitterError::ToolNotFound { tool } if tool == "/nonexistent/objcopy"
        ));
    }
}
