//! CLI command for `debugsplit path`

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::commands::load_config;
use crate::cli::output::is_json;
use crate::core::config::Overrides;
use crate::core::store::DebugStore;

/// Execute the path command
pub async fn execute(
    project_dir: &Path,
    build_id: &str,
    debug_dir: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(project_dir, config_path)?.with_overrides(Overrides {
        debug_dir,
        ..Overrides::default()
    });
    let store = DebugStore::new(project_dir.join(config.debug_dir()));
    let path = store.debug_file_path(build_id)?;

    // Printed even in quiet mode; the path is the whole point
    if is_json() {
        println!("{}", serde_json::json!({ "build_id": build_id, "debug_file": path }));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
