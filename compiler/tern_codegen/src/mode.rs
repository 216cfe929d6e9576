//! What kind of output a compilation produces.

use std::fmt;

/// Class builder mode.
///
/// Only [`Full`](Self::Full) emits method bodies. The other modes produce
/// signatures for consumers that never execute the output (IDE light
/// classes, annotation-processing stubs), which is also why the driver skips
/// its post-generation cancellation checkpoint for them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ClassBuilderMode {
    /// Complete bytecode with method bodies.
    #[default]
    Full,
    /// Signatures only, for IDE symbol resolution.
    LightClasses,
    /// Signatures only, for annotation-processing stubs.
    Stubs,
}

impl ClassBuilderMode {
    pub fn generate_bodies(self) -> bool {
        match self {
            ClassBuilderMode::Full => true,
            ClassBuilderMode::LightClasses | ClassBuilderMode::Stubs => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassBuilderMode::Full => "full",
            ClassBuilderMode::LightClasses => "light-classes",
            ClassBuilderMode::Stubs => "stubs",
        }
    }
}

impl fmt::Display for ClassBuilderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
