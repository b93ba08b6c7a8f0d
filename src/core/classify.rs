//! Split eligibility
//!
//! Decides whether debug information should be split out of a binary,
//! following the order used by `dh_strip`: missing debug sections first,
//! then a missing build-id, then an unsupported object type.

use std::fmt;

use crate::core::elf::{ElfFile, ElfType};

/// Outcome of classifying a binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Debug information will be split out
    Eligible,
    /// The binary has no debug sections
    SkippedNoDebugInfo,
    /// The binary has debug sections but no build-id to name them by
    SkippedNoBuildId,
    /// The object type cannot be split (relocatable objects, core dumps)
    SkippedUnsupportedType(ElfType),
}

impl Classification {
    /// Whether splitting should go ahead
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    /// Short machine-friendly label
    pub fn label(self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::SkippedNoDebugInfo => "no-debug-info",
            Self::SkippedNoBuildId => "no-build-id",
            Self::SkippedUnsupportedType(_) => "unsupported-type",
        }
    }

    /// Emit the diagnostic for a skipped binary.
    ///
    /// Missing debug info and missing build-ids are routine and only traced
    /// at debug level; an unsupported object type is worth a notice.
    pub fn report(self, elf: &ElfFile) {
        let path = elf.path.display();
        match self {
            Self::Eligible => {}
            Self::SkippedNoDebugInfo => {
                tracing::debug!("No debug info found for '{path}'");
            }
            Self::SkippedNoBuildId => {
                tracing::debug!("No debug info extracted for '{path}' due to missing build-id");
            }
            Self::SkippedUnsupportedType(elf_type) => {
                tracing::info!("Skip debug extraction for '{path}' with ELF type {elf_type}");
            }
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => write!(f, "eligible"),
            Self::SkippedNoDebugInfo => write!(f, "no debug info"),
            Self::SkippedNoBuildId => write!(f, "missing build-id"),
            Self::SkippedUnsupportedType(t) => write!(f, "unsupported ELF type {t}"),
        }
    }
}

/// Classify a binary. First matching rule wins.
pub fn classify(elf: &ElfFile) -> Classification {
    if !elf.has_debug_info {
        return Classification::SkippedNoDebugInfo;
    }

    if elf.build_id.as_deref().map_or(true, str::is_empty) {
        return Classification::SkippedNoBuildId;
    }

    if !elf.elf_type.is_splittable() {
        return Classification::SkippedUnsupportedType(elf.elf_type);
    }

    Classification::Eligible
}
