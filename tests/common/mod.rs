//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a scratch
//! project directory, ELF fixtures and fake binutils.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use debugsplit::error::SplitterError;
use debugsplit::infra::process::{CommandRunner, ToolCommand};
use object::write::Object;
use object::{Architecture, BinaryFormat, Endianness, SectionKind};
use tempfile::TempDir;

/// `NT_GNU_BUILD_ID`
const NT_GNU_BUILD_ID: u32 = 3;

/// ELF object type written into `e_type`
#[derive(Debug, Clone, Copy)]
pub enum FixtureType {
    Rel = 1,
    Exec = 2,
    Dyn = 3,
    Core = 4,
}

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write an ELF fixture into the project with the given permission bits
    pub fn create_elf(&self, name: &str, fixture: &ElfFixture, mode: u32) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, fixture.to_bytes()).expect("Failed to write ELF fixture");
        set_mode(&path, mode);
        path
    }

    /// Install fake `objcopy` and `strip` scripts under `bin/`, optionally
    /// prefixed with a target triplet. Returns the `bin/` directory.
    pub fn install_fake_binutils(&self, arch_triplet: Option<&str>) -> PathBuf {
        let bin = self.dir.path().join("bin");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");
        let log = self.dir.path().join("tools.log");
        let prefix = arch_triplet.map(|t| format!("{t}-")).unwrap_or_default();

        write_script(&bin.join(format!("{prefix}objcopy")), &fake_objcopy(&log));
        write_script(&bin.join(format!("{prefix}strip")), &fake_strip(&log));
        bin
    }

    /// Lines written by the fake binutils, one per invocation
    pub fn tool_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("tools.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A minimal x86-64 ELF file built with the `object` writer
#[derive(Debug, Clone)]
pub struct ElfFixture {
    pub elf_type: FixtureType,
    pub debug_info: bool,
    pub build_id: Option<Vec<u8>>,
}

impl ElfFixture {
    /// A linked executable with debug info and the given build-id
    pub fn executable(build_id: &[u8]) -> Self {
        Self {
            elf_type: FixtureType::Exec,
            debug_info: true,
            build_id: Some(build_id.to_vec()),
        }
    }

    /// A shared object with debug info and the given build-id
    pub fn shared_object(build_id: &[u8]) -> Self {
        Self {
            elf_type: FixtureType::Dyn,
            ..Self::executable(build_id)
        }
    }

    /// A relocatable object with debug info and the given build-id
    pub fn relocatable(build_id: &[u8]) -> Self {
        Self {
            elf_type: FixtureType::Rel,
            ..Self::executable(build_id)
        }
    }

    #[must_use]
    pub fn without_debug_info(mut self) -> Self {
        self.debug_info = false;
        self
    }

    #[must_use]
    pub fn without_build_id(mut self) -> Self {
        self.build_id = None;
        self
    }

    /// Serialize the fixture.
    ///
    /// The writer only produces relocatable objects, so `e_type` is patched
    /// afterwards; section headers are all the inspector reads.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);

        let text = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);
        obj.append_section_data(text, &[0x55, 0x48, 0x89, 0xe5, 0x5d, 0xc3], 1);

        if self.debug_info {
            let info = obj.add_section(Vec::new(), b".debug_info".to_vec(), SectionKind::Debug);
            obj.append_section_data(info, &[0u8; 32], 1);
        }

        if let Some(id) = &self.build_id {
            let note = obj.add_section(
                Vec::new(),
                b".note.gnu.build-id".to_vec(),
                SectionKind::Note,
            );
            obj.append_section_data(note, &build_id_note(id), 4);
        }

        let mut bytes = obj.write().expect("Failed to write ELF fixture");
        bytes[16..18].copy_from_slice(&(self.elf_type as u16).to_le_bytes());
        bytes
    }
}

/// Encode a GNU build-id note
pub fn build_id_note(id: &[u8]) -> Vec<u8> {
    let mut note = Vec::new();
    note.extend_from_slice(&4u32.to_le_bytes());
    note.extend_from_slice(&u32::try_from(id.len()).unwrap().to_le_bytes());
    note.extend_from_slice(&NT_GNU_BUILD_ID.to_le_bytes());
    note.extend_from_slice(b"GNU\0");
    note.extend_from_slice(id);
    while note.len() % 4 != 0 {
        note.push(0);
    }
    note
}

/// Set permission bits on a file
pub fn set_mode(path: &Path, mode: u32) {
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .expect("Failed to set permissions");
}

/// Write an executable shell script
pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("Failed to write script");
    set_mode(path, 0o755);
}

/// objcopy stand-in: logs its arguments, copies the binary for
/// `--only-keep-debug` and appends a marker for `--add-gnu-debuglink`
fn fake_objcopy(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "objcopy $*" >> '{log}'
case "$1" in
  --version) echo "GNU objcopy (GNU Binutils) 2.42" ;;
  --only-keep-debug) cp "$3" "$4" ;;
  --add-gnu-debuglink) printf 'debuglink' >> "$3" ;;
esac
"#,
        log = log.display()
    )
}

/// strip stand-in: logs its arguments
fn fake_strip(log: &Path) -> String {
    format!(
        r#"#!/bin/sh
echo "strip $*" >> '{log}'
if [ "$1" = "--version" ]; then echo "GNU strip (GNU Binutils) 2.42"; fi
"#,
        log = log.display()
    )
}

/// In-process runner that imitates binutils on the filesystem.
///
/// The extracted debug file is derived from the binary's path only, so a
/// second run over the same binary writes identical bytes.
#[derive(Debug, Default)]
pub struct FakeBinutils {
    calls: Mutex<Vec<ToolCommand>>,
}

impl FakeBinutils {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().iter().map(ToolCommand::argv).collect()
    }
}

impl CommandRunner for FakeBinutils {
    fn run(&self, command: &ToolCommand) -> Result<(), SplitterError> {
        self.calls.lock().unwrap().push(command.clone());
        let args = command.argv();
        if args.get(1).map(String::as_str) == Some("--only-keep-debug") {
            let (binary, debug_file) = (&args[3], &args[4]);
            std::fs::write(debug_file, format!("debug info of {binary}\n")).map_err(|e| {
                SplitterError::Spawn {
                    command: command.display(),
                    error: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}
