use crate::{Dialect, Error};

/// Tells whether a driver error reports a uniqueness violation.
pub trait ConflictClassifier {
    fn is_conflict(&self, error: &Error) -> bool;
}

/// Matches the engine's unique violation message anywhere in the error chain.
///
/// Relies on the engine wording, which is not localized by the supported engines but is not a
/// stable API either. The generic dialect never reports conflicts.
impl ConflictClassifier for Dialect {
    fn is_conflict(&self, error: &Error) -> bool {
        let Some(marker) = self.unique_violation_marker() else {
            return false;
        };
        error.chain().any(|e| e.to_string().contains(marker))
    }
}

pub fn is_conflict(dialect: Dialect, error: &Error) -> bool {
    dialect.is_conflict(error)
}
