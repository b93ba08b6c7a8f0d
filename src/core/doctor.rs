//! Doctor command logic
//!
//! Checks that the binutils needed for splitting can be found for the
//! configured target, and that the project configuration parses.

use std::path::Path;

use crate::config::defaults::{OBJCOPY_TOOL, STRIP_TOOL};
use crate::core::config::SplitConfig;
use crate::infra::tools::{command_for_arch, ToolResolver};

/// Result of a single check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of what was checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Resolved location, if any
    pub path: Option<String>,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, path: Option<String>, version: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            path,
            version,
            error: None,
            suggestion: None,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            path: None,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Configuration issues found
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a configuration issue
    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    /// Check if all checks passed and the configuration is clean
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.config_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get all failed checks
    pub fn failed(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }
}

/// Run `<tool> --version` and pull out the version number
pub fn tool_version(tool: &Path) -> Option<String> {
    std::process::Command::new(tool)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            let stdout = String::from_utf8_lossy(&output.stdout);
            stdout.lines().next().and_then(extract_version)
        })
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:\.\w+)?)").ok()?;
    version_regex
        .captures_iter(output)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check that one tool resolves for the target
pub fn check_tool(
    resolver: &impl ToolResolver,
    tool: &str,
    arch_triplet: Option<&str>,
) -> CheckResult {
    let name = command_for_arch(tool, arch_triplet);
    match resolver.resolve(tool, arch_triplet) {
        Ok(path) => CheckResult::pass(&name, Some(path.display().to_string()), tool_version(&path)),
        Err(e) => {
            let suggestion = if arch_triplet.is_some() {
                "Install the cross binutils for this target (e.g. binutils-<triplet>)"
            } else {
                "Install binutils with your package manager"
            };
            CheckResult::fail(&name, &e.to_string(), Some(suggestion))
        }
    }
}

/// Check the configuration file, if there is one
pub fn check_config(config_path: &Path) -> Vec<String> {
    match SplitConfig::load_from_path(config_path) {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    }
}

/// Run all doctor checks
pub fn run_doctor(
    resolver: &impl ToolResolver,
    arch_triplet: Option<&str>,
    config_path: Option<&Path>,
) -> DoctorReport {
    let mut report = DoctorReport::new();

    report.add_check(check_tool(resolver, OBJCOPY_TOOL, arch_triplet));
    report.add_check(check_tool(resolver, STRIP_TOOL, arch_triplet));

    if let Some(path) = config_path {
        for issue in check_config(path) {
            report.add_config_issue(issue);
        }
    }

    report
}
