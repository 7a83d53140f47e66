//! Write Outcome

/// Result of a guarded write
///
/// `Skipped` means the write was never attempted because no signed-in user
/// with a resolved profile was available. It is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum WriteOutcome<T = ()> {
    Written(T),
    Skipped,
}

impl<T> WriteOutcome<T> {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }

    pub fn into_written(self) -> Option<T> {
        match self {
            WriteOutcome::Written(value) => Some(value),
            WriteOutcome::Skipped => None,
        }
    }
}
