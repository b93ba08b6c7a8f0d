//! ELF inspection backed by goblin

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use goblin::elf::note::NT_GNU_BUILD_ID;
use goblin::elf::Elf;

use crate::core::elf::{ElfFile, ElfInspector, ElfType, ELF_MAGIC};
use crate::error::InspectError;

/// Section holding the GNU build-id note
const BUILD_ID_SECTION: &str = ".note.gnu.build-id";

/// Section name prefixes that carry DWARF
const DEBUG_SECTION_PREFIXES: &[&str] = &[".debug_", ".zdebug_"];

/// Reads ELF headers with goblin
#[derive(Debug, Clone, Copy, Default)]
pub struct GoblinInspector;

impl ElfInspector for GoblinInspector {
    fn inspect(&self, path: &Path) -> Result<ElfFile, InspectError> {
        let read_error = |e: std::io::Error| InspectError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        };

        let mode = std::fs::metadata(path).map_err(read_error)?.permissions().mode() & 0o7777;
        let bytes = std::fs::read(path).map_err(read_error)?;

        if !bytes.starts_with(ELF_MAGIC) {
            return Err(InspectError::NotElf {
                path: path.to_path_buf(),
            });
        }

        let elf = Elf::parse(&bytes).map_err(|e| InspectError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(ElfFile {
            path: path.to_path_buf(),
            mode,
            has_debug_info: has_debug_sections(&elf),
            build_id: build_id(&elf, &bytes),
            elf_type: ElfType::from_e_type(elf.header.e_type),
        })
    }
}

fn has_debug_sections(elf: &Elf<'_>) -> bool {
    elf.section_headers.iter().any(|sh| {
        elf.shdr_strtab
            .get_at(sh.sh_name)
            .is_some_and(|name| DEBUG_SECTION_PREFIXES.iter().any(|p| name.starts_with(p)))
    })
}

/// Hex build-id from the GNU build-id note.
///
/// Program headers are tried first since linked binaries always map the
/// note; section headers cover relocatable objects.
fn build_id(elf: &Elf<'_>, bytes: &[u8]) -> Option<String> {
    let from_segments = elf.iter_note_headers(bytes).into_iter().flatten();
    let from_sections = elf
        .iter_note_sections(bytes, Some(BUILD_ID_SECTION))
        .into_iter()
        .flatten();

    from_segments
        .chain(from_sections)
        .filter_map(Result::ok)
        .find(|note| note.n_type == NT_GNU_BUILD_ID && note.name.trim_end_matches('\0') == "GNU")
        .filter(|note| !note.desc.is_empty())
        .map(|note| hex::encode(note.desc))
}
