//! Test utilities
//!
//! Proptest generators and in-memory stand-ins for the inspector and the
//! command runner.

#[cfg(test)]
pub mod generators {
    use crate::core::elf::ElfType;
    use proptest::prelude::*;

    /// Generate a lowercase hex build-id (SHA-1 and MD5 sized, plus odd lengths)
    pub fn build_id() -> impl Strategy<Value = String> {
        prop_oneof!["[0-9a-f]{40}", "[0-9a-f]{32}", "[0-9a-f]{3,64}"]
    }

    /// Generate an ELF object type
    pub fn elf_type() -> impl Strategy<Value = ElfType> {
        prop_oneof![
            Just(ElfType::Exec),
            Just(ElfType::Dyn),
            Just(ElfType::Rel),
            Just(ElfType::Core),
            (5u16..0xffff).prop_map(ElfType::Other),
        ]
    }

    /// Generate permission bits
    pub fn mode() -> impl Strategy<Value = u32> {
        0u32..0o1000
    }

    /// Generate a GNU target triplet
    pub fn arch_triplet() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("arm-linux-gnueabihf".to_string()),
            Just("aarch64-linux-gnu".to_string()),
            Just("x86_64-linux-gnu".to_string()),
            Just("riscv64-linux-gnu".to_string()),
        ]
    }
}

#[cfg(test)]
pub mod fakes {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::core::elf::{ElfFile, ElfInspector};
    use crate::error::{InspectError, SplitterError};
    use crate::infra::process::{CommandRunner, ToolCommand};

    /// Records every command and optionally fails on one of them
    #[derive(Debug, Default)]
    pub struct RecordingRunner {
        calls: Mutex<Vec<ToolCommand>>,
        fail_on: Option<(String, i32)>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail with `code` on any command having an argument equal to `arg`
        pub fn failing_on(arg: &str, code: i32) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some((arg.to_string(), code)),
            }
        }

        pub fn calls(&self) -> Vec<ToolCommand> {
            self.calls.lock().unwrap().clone()
        }

        pub fn argvs(&self) -> Vec<Vec<String>> {
            self.calls().iter().map(ToolCommand::argv).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &ToolCommand) -> Result<(), SplitterError> {
            self.calls.lock().unwrap().push(command.clone());
            match &self.fail_on {
                Some((arg, code)) if command.args.iter().any(|a| a == arg.as_str()) => {
                    Err(SplitterError::ToolFailed {
                        command: command.display(),
                        code: *code,
                    })
                }
                _ => Ok(()),
            }
        }
    }

    /// Serves canned [`ElfFile`] descriptions by path
    #[derive(Debug, Default)]
    pub struct FakeInspector {
        files: HashMap<PathBuf, ElfFile>,
    }

    impl FakeInspector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, elf: ElfFile) -> Self {
            self.files.insert(elf.path.clone(), elf);
            self
        }
    }

    impl ElfInspector for FakeInspector {
        fn inspect(&self, path: &Path) -> Result<ElfFile, InspectError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| InspectError::NotElf {
                    path: path.to_path_buf(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_build_id_generator(id in build_id()) {
            prop_assert!(id.len() >= 3);
            prop_assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }

        #[test]
        fn test_mode_generator(mode in mode()) {
            prop_assert!(mode <= 0o777);
        }

        #[test]
        fn test_arch_triplet_generator(triplet in arch_triplet()) {
            prop_assert_eq!(triplet.split('-').count(), 3);
        }
    }
}
