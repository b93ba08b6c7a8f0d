//! Build-id keyed debug store
//!
//! Debug files live at `<root>/<first two build-id chars>/<rest>.debug`, the
//! layout gdb, debuginfod and friends look for under `.build-id/`.

use std::path::{Path, PathBuf};

use crate::config::defaults::{BUILD_ID_SHARD_LEN, DEBUG_FILE_SUFFIX};
use crate::error::SplitterError;

/// Content-addressed directory of split debug files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugStore {
    root: PathBuf,
}

impl DebugStore {
    /// Create a store rooted at `root`. Nothing is created on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the debug file for `build_id`
    pub fn debug_file_path(&self, build_id: &str) -> Result<PathBuf, SplitterError> {
        validate_build_id(build_id)?;
        let (shard, rest) = build_id.split_at(BUILD_ID_SHARD_LEN);
        Ok(self.root.join(shard).join(format!("{rest}{DEBUG_FILE_SUFFIX}")))
    }

    /// Path of the debug file for `build_id`, with its shard directory created.
    ///
    /// Safe to call concurrently for build-ids sharing a shard.
    pub fn prepare(&self, build_id: &str) -> Result<PathBuf, SplitterError> {
        let debug_file = self.debug_file_path(build_id)?;
        if let Some(parent) = debug_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SplitterError::CreateDir {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }
        Ok(debug_file)
    }
}

fn validate_build_id(build_id: &str) -> Result<(), SplitterError> {
    if build_id.len() <= BUILD_ID_SHARD_LEN || !build_id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SplitterError::InvalidBuildId {
            build_id: build_id.to_string(),
        });
    }
    Ok(())
}
