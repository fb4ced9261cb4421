//! Settings defining what to emit

use thiserror::Error;

/// Default number of cells allocated by the generated program at start-up.
pub const DEFAULT_INIT_SIZE: u64 = 1 << 10;
/// Default number of cells the generated program grows the tape by.
pub const DEFAULT_EXTEND_SIZE: u64 = 1 << 10;
/// Default cell type of the generated program.
pub const DEFAULT_CELL_TYPE: &str = "char";

/// Settings for one translation run. Read-only once translation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Settings {
    /// C type name of a tape cell, substituted verbatim into declarations.
    pub cell_type: String,
    /// Pass non-instruction bytes through as `//` comments.
    pub comments: bool,
    /// Initial tape size in cells.
    pub init_size: u64,
    /// Number of cells added on each growth step, on either side.
    pub extend_size: u64,
    /// Merge runs of `+`/`-` and `<`/`>` into single counted statements.
    pub coalesce: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_type: DEFAULT_CELL_TYPE.into(),
            comments: false,
            init_size: DEFAULT_INIT_SIZE,
            extend_size: DEFAULT_EXTEND_SIZE,
            coalesce: false,
        }
    }
}

/// Settings that cannot produce a valid program
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Cell type must not be empty")]
    EmptyCellType,
    #[error("Cell type {0:?} contains control characters")]
    InvalidCellType(String),
    #[error("Initial tape size must be at least one cell")]
    ZeroInitSize,
    #[error("Tape extension size must be at least one cell")]
    ZeroExtendSize,
}

impl Settings {
    /// Check the preconditions the emitted runtime relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cell_type.trim().is_empty() {
            return Err(SettingsError::EmptyCellType);
        }
        if self.cell_type.chars().any(char::is_control) {
            return Err(SettingsError::InvalidCellType(self.cell_type.clone()));
        }
        if self.init_size == 0 {
            return Err(SettingsError::ZeroInitSize);
        }
        if self.extend_size == 0 {
            return Err(SettingsError::ZeroExtendSize);
        }
        Ok(())
    }

    /// Whether the cell type is one of the C character types, i.e. cells
    /// are 8 bit and wrap modulo 256.
    pub fn has_byte_cells(&self) -> bool {
        let words: Vec<&str> = self.cell_type.split_whitespace().collect();
        matches!(
            words.as_slice(),
            ["char"] | ["signed", "char"] | ["unsigned", "char"]
        )
    }
}
