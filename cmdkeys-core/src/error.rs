/// Structured error types for cmdkeys-core.
///
/// Uses `thiserror` so hosts get composable errors. The binary crate
/// (cmdkeys-cli) wraps these in `anyhow` with extra context.
///
/// Input validation failures (bad delay text) are *not* errors here: they are
/// reported through [`crate::field::TicksError`] and surface only as a field
/// colour. The variants below are structural problems that indicate a bug in
/// row composition or a broken persisted profile.
use thiserror::Error;

/// Structural invariant violations in a slot sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowListError {
    /// A spacer does not immediately follow the row it claims to extend
    #[error("spacer at slot {slot} points at slot {owner}, expected {expected}")]
    OrphanSpacer {
        slot: usize,
        owner: usize,
        expected: usize,
    },

    /// A spacer refers to another spacer instead of a row
    #[error("spacer at slot {slot} is owned by another spacer")]
    NestedSpacer { slot: usize },

    /// The list has no message rows where one was required
    #[error("no message row present in list of {len} slots")]
    NoMessageRow { len: usize },

    /// A drag began on a slot that does not hold a message row
    #[error("slot {slot} is not a message row")]
    NotAMessageRow { slot: usize },

    /// A slot index fell outside the list
    #[error("slot {slot} out of range (len {len})")]
    SlotOutOfRange { slot: usize, len: usize },
}

/// Main error type for cmdkeys-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Row composition produced an inconsistent list
    #[error("row list invariant violated: {0}")]
    RowList(#[from] RowListError),

    /// The editor was pointed at a macro the profile does not have
    #[error("macro index {index} out of range (profile has {len} macros)")]
    MacroOutOfRange { index: usize, len: usize },

    /// A message index fell outside the macro's sequence
    #[error("message index {index} out of range (macro has {len} messages)")]
    MessageOutOfRange { index: usize, len: usize },

    /// Profile TOML could not be decoded
    #[error("failed to parse profile: {0}")]
    ProfileParse(#[from] toml::de::Error),

    /// Profile could not be encoded as TOML
    #[error("failed to serialize profile: {0}")]
    ProfileSerialize(#[from] toml::ser::Error),

    /// Persistence collaborator failure
    #[error("profile store error: {reason}")]
    Store { reason: String },
}

/// Result type alias for cmdkeys-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a macro range error
    pub fn macro_out_of_range(index: usize, len: usize) -> Self {
        Self::MacroOutOfRange { index, len }
    }

    /// Create a message range error
    pub fn message_out_of_range(index: usize, len: usize) -> Self {
        Self::MessageOutOfRange { index, len }
    }

    /// Create a store error
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RowListError::OrphanSpacer {
            slot: 5,
            owner: 2,
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "spacer at slot 5 points at slot 2, expected 4"
        );

        let err = CoreError::macro_out_of_range(3, 1);
        assert!(err.to_string().contains("macro index 3"));
    }

    #[test]
    fn test_rowlist_error_conversion() {
        let err: CoreError = RowListError::NoMessageRow { len: 4 }.into();
        assert!(matches!(err, CoreError::RowList(RowListError::NoMessageRow { len: 4 })));
    }
}
