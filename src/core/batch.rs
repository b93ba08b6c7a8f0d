//! Splitting many binaries at once
//!
//! Walks the given paths for ELF files and splits each of them, several at a
//! time. Binaries are independent of each other, so a failure is recorded
//! against its file and the rest carry on.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::core::classify::{classify, Classification};
use crate::core::elf::{is_elf_file, ElfInspector};
use crate::core::splitter::DebugSplitter;
use crate::infra::process::CommandRunner;

/// Called once per finished file
pub type ProgressCallback = Arc<dyn Fn(&FileResult) + Send + Sync>;

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Debug info written to the given path
    Split(PathBuf),
    /// File left alone
    Skipped(Classification),
    /// Inspection or a tool failed
    Failed(String),
}

/// Result for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// The binary
    pub path: PathBuf,
    /// What happened to it
    pub outcome: SplitOutcome,
}

/// Summary of a batch run
#[derive(Debug, Default, Clone)]
pub struct SplitReport {
    /// Per-file results, in input order
    pub results: Vec<FileResult>,
}

impl SplitReport {
    /// Number of files whose debug info was split out
    pub fn split_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SplitOutcome::Split(_)))
            .count()
    }

    /// Number of skipped files
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SplitOutcome::Skipped(_)))
            .count()
    }

    /// Files that failed
    pub fn failures(&self) -> Vec<&FileResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, SplitOutcome::Failed(_)))
            .collect()
    }

    /// Whether every file was either split or skipped
    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    /// Debug files written during the run
    pub fn debug_files(&self) -> Vec<&Path> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                SplitOutcome::Split(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Find ELF files under the given paths.
///
/// Files named directly are kept whatever their content, so that a wrong
/// argument is reported rather than silently ignored. Directories are walked
/// without following symlinks, keeping only regular files with the ELF magic.
pub fn find_elf_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            anyhow::bail!("Path not found: {}", path.display());
        }

        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for entry in walkdir::WalkDir::new(path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if entry.file_type().is_file() && is_elf_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    let mut seen = HashSet::new();
    files.retain(|p| seen.insert(p.clone()));
    Ok(files)
}

/// Inspect and split a single file
pub fn split_file<R: CommandRunner>(
    splitter: &DebugSplitter<R>,
    inspector: &dyn ElfInspector,
    path: &Path,
) -> FileResult {
    let outcome = match inspector.inspect(path) {
        Err(e) => SplitOutcome::Failed(e.to_string()),
        Ok(elf) => match splitter.split(&elf) {
            Ok(Some(debug_file)) => SplitOutcome::Split(debug_file),
            Ok(None) => SplitOutcome::Skipped(classify(&elf)),
            Err(e) => SplitOutcome::Failed(e.to_string()),
        },
    };

    if let SplitOutcome::Failed(error) = &outcome {
        tracing::warn!("Failed to split {}: {}", path.display(), error);
    }

    FileResult {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Split every file, at most `jobs` at a time
pub async fn split_all<R>(
    splitter: Arc<DebugSplitter<R>>,
    inspector: Arc<dyn ElfInspector>,
    files: Vec<PathBuf>,
    jobs: usize,
    progress: Option<ProgressCallback>,
) -> SplitReport
where
    R: CommandRunner + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let sem = semaphore.clone();
            let splitter = splitter.clone();
            let inspector = inspector.clone();
            let progress = progress.clone();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem.acquire_owned().await;
                let result = tokio::task::spawn_blocking(move || {
                    split_file(&splitter, inspector.as_ref(), &task_path)
                })
                .await?;
                if let Some(progress) = &progress {
                    progress(&result);
                }
                Ok::<_, tokio::task::JoinError>(result)
            });
            (path, handle)
        })
        .collect();

    let mut report = SplitReport::default();
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) | Err(e) => FileResult {
                path,
                outcome: SplitOutcome::Failed(format!("split task failed: {e}")),
            },
        };
        report.results.push(result);
    }

    report
}
