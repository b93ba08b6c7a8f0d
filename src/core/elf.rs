//! ELF artifact model
//!
//! Describes a linked binary as seen by an [`ElfInspector`]: where it lives,
//! its permission bits, whether it carries debug sections, its build-id and
//! its ELF object type.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::InspectError;

/// ELF magic bytes
pub const ELF_MAGIC: &[u8] = &[0x7f, b'E', b'L', b'F'];

/// All three execute bits (owner, group, other)
pub const EXEC_BITS: u32 = 0o111;

/// ELF object file type (`e_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElfType {
    /// Relocatable object (`ET_REL`)
    Rel,
    /// Executable (`ET_EXEC`)
    Exec,
    /// Shared object or position-independent executable (`ET_DYN`)
    Dyn,
    /// Core dump (`ET_CORE`)
    Core,
    /// Anything else, including `ET_NONE` and OS/processor specific values
    Other(u16),
}

impl ElfType {
    /// Map a raw `e_type` value
    pub fn from_e_type(e_type: u16) -> Self {
        match e_type {
            1 => Self::Rel,
            2 => Self::Exec,
            3 => Self::Dyn,
            4 => Self::Core,
            other => Self::Other(other),
        }
    }

    /// Whether debug information can be split out of this kind of object
    pub fn is_splittable(self) -> bool {
        matches!(self, Self::Exec | Self::Dyn)
    }
}

impl fmt::Display for ElfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rel => write!(f, "ET_REL"),
            Self::Exec => write!(f, "ET_EXEC"),
            Self::Dyn => write!(f, "ET_DYN"),
            Self::Core => write!(f, "ET_CORE"),
            Self::Other(value) => write!(f, "ET_{value:#x}"),
        }
    }
}

/// A linked binary on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElfFile {
    /// Path to the binary
    pub path: PathBuf,
    /// Permission bits (`st_mode & 0o7777`)
    pub mode: u32,
    /// Whether any debug section is present
    pub has_debug_info: bool,
    /// Lowercase hex build-id, if the binary has one
    pub build_id: Option<String>,
    /// Object type
    pub elf_type: ElfType,
}

impl ElfFile {
    /// Whether the permission bits mark this file as an executable.
    ///
    /// Matches `dh_strip`: only a file executable by owner, group and other
    /// counts; everything else is treated as a shared object.
    pub fn is_executable(&self) -> bool {
        self.mode & EXEC_BITS == EXEC_BITS
    }
}

/// Source of [`ElfFile`] descriptions
pub trait ElfInspector: Send + Sync {
    /// Inspect the binary at `path`
    fn inspect(&self, path: &Path) -> Result<ElfFile, InspectError>;
}

/// Check if a file starts with the ELF magic
pub fn is_elf_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    let mut magic = [0u8; 4];
    match File::open(path).and_then(|mut f| f.read_exact(&mut magic)) {
        Ok(()) => magic == ELF_MAGIC,
        Err(_) => false,
    }
}
