//! CLI command for `debugsplit split`
//!
//! Splits debug info out of every ELF binary under the given paths.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::commands::load_config;
use crate::cli::output::{
    create_split_bar, is_json, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::batch::{self, FileResult, ProgressCallback, SplitOutcome, SplitReport};
use crate::core::config::Overrides;
use crate::core::splitter::DebugSplitter;
use crate::infra::inspect::GoblinInspector;
use crate::infra::tools::PathResolver;

/// Options for the split command
#[derive(Debug, Default)]
pub struct SplitOptions {
    /// Binaries or directories to process
    pub paths: Vec<PathBuf>,
    /// Debug store directory override
    pub debug_dir: Option<PathBuf>,
    /// Target triplet override
    pub arch_triplet: Option<String>,
    /// Parallel jobs override
    pub jobs: Option<usize>,
    /// Explicit config file
    pub config: Option<PathBuf>,
}

/// Execute the split command
pub async fn execute(project_dir: &Path, options: SplitOptions) -> Result<()> {
    let config = load_config(project_dir, options.config.as_deref())?.with_overrides(Overrides {
        arch_triplet: options.arch_triplet,
        debug_dir: options.debug_dir,
        jobs: options.jobs,
    });

    let tools = config
        .host_tools(&PathResolver::new())
        .context("Cannot split debug info without binutils")?;
    let splitter = Arc::new(DebugSplitter::new(tools, project_dir.join(config.debug_dir())));
    let debug_dir = splitter.store().root().to_path_buf();

    let files = batch::find_elf_files(&options.paths)?;
    tracing::debug!("Found {} candidate binaries", files.len());

    if files.is_empty() {
        if is_json() {
            print_json(&SplitReport::default(), &debug_dir);
        } else {
            print_info("No ELF binaries found");
        }
        return Ok(());
    }

    let bar = create_split_bar(files.len() as u64);
    let progress: ProgressCallback = {
        let bar = bar.clone();
        Arc::new(move |result: &FileResult| {
            if let Some(name) = result.path.file_name() {
                bar.set_message(name.to_string_lossy().into_owned());
            }
            bar.inc(1);
        })
    };

    let report = batch::split_all(
        splitter,
        Arc::new(GoblinInspector),
        files,
        config.jobs(),
        Some(progress),
    )
    .await;
    bar.finish_and_clear();

    if is_json() {
        print_json(&report, &debug_dir);
    } else {
        print_summary(&report, &debug_dir);
    }

    let failures = report.failures().len();
    if failures > 0 {
        anyhow::bail!(
            "Failed to split {failures} of {} binaries",
            report.results.len()
        );
    }
    Ok(())
}

fn print_summary(report: &SplitReport, debug_dir: &Path) {
    for result in &report.results {
        match &result.outcome {
            SplitOutcome::Split(debug_file) => {
                print_detail(&format!(
                    "{} {} -> {}",
                    status::SUCCESS,
                    result.path.display(),
                    debug_file.display()
                ));
            }
            SplitOutcome::Skipped(reason) => {
                print_detail(&format!("- {} ({reason})", result.path.display()));
            }
            SplitOutcome::Failed(error) => {
                print_detail(&format!("{} {}: {error}", status::ERROR, result.path.display()));
            }
        }
    }

    let split = report.split_count();
    let skipped = report.skipped_count();
    let failed = report.failures().len();
    if failed == 0 {
        print_success(&format!(
            "Split {split} binaries into {} ({skipped} skipped)",
            debug_dir.display()
        ));
    } else {
        print_warning(&format!(
            "Split {split} binaries, {skipped} skipped, {failed} failed"
        ));
    }
}

fn print_json(report: &SplitReport, debug_dir: &Path) {
    let files: Vec<_> = report
        .results
        .iter()
        .map(|r| match &r.outcome {
            SplitOutcome::Split(debug_file) => serde_json::json!({
                "path": r.path,
                "outcome": "split",
                "debug_file": debug_file,
            }),
            SplitOutcome::Skipped(reason) => serde_json::json!({
                "path": r.path,
                "outcome": "skipped",
                "reason": reason.label(),
            }),
            SplitOutcome::Failed(error) => serde_json::json!({
                "path": r.path,
                "outcome": "failed",
                "error": error,
            }),
        })
        .collect();

    let json = serde_json::json!({
        "status": if report.is_success() { "success" } else { "error" },
        "debug_dir": debug_dir,
        "split": report.split_count(),
        "skipped": report.skipped_count(),
        "failed": report.failures().len(),
        "files": files,
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}
