//! CLI command for `debugsplit doctor`
//!
//! Checks that objcopy and strip can be found and reports issues with
//! suggestions.

use anyhow::Result;
use std::path::Path;

use crate::cli::commands::{config_file_path, load_config};
use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::config::Overrides;
use crate::core::doctor::run_doctor;
use crate::infra::tools::PathResolver;

/// Execute the doctor command
pub async fn execute(
    project_dir: &Path,
    arch_triplet: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    // A broken config file is reported by the checks rather than aborting here
    let triplet = load_config(project_dir, config_path)
        .unwrap_or_default()
        .with_overrides(Overrides {
            arch_triplet,
            ..Overrides::default()
        })
        .arch_triplet()
        .map(String::from);

    let config_file = config_file_path(project_dir, config_path);
    let report = run_doctor(&PathResolver::new(), triplet.as_deref(), Some(&config_file));

    // JSON output mode
    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() { "success" } else { "error" },
            "arch_triplet": triplet,
            "checks": report.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "passed": c.passed,
                "path": c.path,
                "version": c.version,
                "error": c.error,
                "suggestion": c.suggestion
            })).collect::<Vec<_>>(),
            "config_issues": report.config_issues,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result).unwrap_or_default());

        if !report.all_passed() {
            return Err(anyhow::anyhow!("Missing required tools"));
        }
        return Ok(());
    }

    // Quiet mode - only show errors
    if is_quiet() {
        if report.all_passed() {
            return Ok(());
        }
        for check in report.failed() {
            eprintln!("{} Missing required: {}", status::ERROR, check.name);
        }
        for issue in &report.config_issues {
            eprintln!("{} {issue}", status::ERROR);
        }
        return Err(anyhow::anyhow!("Missing required tools"));
    }

    // Normal output mode
    match &triplet {
        Some(triplet) => print_info(&format!("Checking binutils for {triplet}...")),
        None => print_info("Checking host binutils..."),
    }
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" (v{v})"))
            .unwrap_or_default();

        if check.passed {
            let path_str = check.path.as_deref().unwrap_or_default();
            println!("  {} {}{version_str} {path_str}", status::SUCCESS, check.name);
        } else {
            println!("  {} {}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Configuration issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
        print_detail("Ready to split debug info.");
        Ok(())
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        Err(anyhow::anyhow!(
            "Missing required tools. Run 'debugsplit doctor' for details."
        ))
    }
}
