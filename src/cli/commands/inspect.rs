//! CLI command for `debugsplit inspect`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::commands::load_config;
use crate::cli::output::{is_json, print_detail, print_info, print_success};
use crate::core::classify::classify;
use crate::core::config::Overrides;
use crate::core::elf::ElfInspector;
use crate::core::store::DebugStore;
use crate::infra::inspect::GoblinInspector;

/// Execute the inspect command
pub async fn execute(
    project_dir: &Path,
    file: &Path,
    debug_dir: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(project_dir, config_path)?.with_overrides(Overrides {
        debug_dir,
        ..Overrides::default()
    });
    let store = DebugStore::new(project_dir.join(config.debug_dir()));

    let elf = GoblinInspector
        .inspect(file)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;
    let classification = classify(&elf);
    let debug_file = match (&elf.build_id, classification.is_eligible()) {
        (Some(build_id), true) => Some(store.debug_file_path(build_id)?),
        _ => None,
    };

    if is_json() {
        let json = serde_json::json!({
            "path": elf.path,
            "elf_type": elf.elf_type.to_string(),
            "mode": format!("{:o}", elf.mode),
            "has_debug_info": elf.has_debug_info,
            "build_id": elf.build_id,
            "classification": classification.label(),
            "debug_file": debug_file,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    print_info(&elf.path.display().to_string());
    print_detail(&format!("Type:       {}", elf.elf_type));
    print_detail(&format!("Mode:       {:o}", elf.mode));
    print_detail(&format!(
        "Debug info: {}",
        if elf.has_debug_info { "yes" } else { "no" }
    ));
    print_detail(&format!(
        "Build-id:   {}",
        elf.build_id.as_deref().unwrap_or("(none)")
    ));

    match debug_file {
        Some(path) => {
            print_success(&format!("Eligible, debug file: {}", path.display()));
        }
        None => print_info(&format!("Skipped: {classification}")),
    }

    Ok(())
}
