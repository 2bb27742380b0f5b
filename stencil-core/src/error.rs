use crate::Error;
use std::borrow::Cow;

/// Conditions the engine reports itself, carried inside [`Error`] so callers can branch on them.
///
/// Driver errors are never converted into this type, their message is kept intact.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    /// The addressed row does not exist: no row selected, no row updated or no row returned.
    #[error("no such record in `{table}`")]
    NotFound { table: String },
    /// The entity type has no usable structural descriptor for the requested operation.
    #[error("metadata unavailable for entity `{entity}`: {reason}")]
    Metadata {
        entity: &'static str,
        reason: Cow<'static, str>,
    },
    #[error("the operation was cancelled")]
    Cancelled,
    #[error("the operation deadline was exceeded")]
    DeadlineExceeded,
}

fn find(error: &Error) -> Option<&CrudError> {
    error.chain().find_map(|e| e.downcast_ref::<CrudError>())
}

/// True when the error is (or wraps) [`CrudError::NotFound`].
pub fn is_not_found(error: &Error) -> bool {
    matches!(find(error), Some(CrudError::NotFound { .. }))
}

/// True when the error is (or wraps) [`CrudError::Metadata`].
pub fn is_metadata_error(error: &Error) -> bool {
    matches!(find(error), Some(CrudError::Metadata { .. }))
}

/// True when the call was cancelled or ran past its deadline.
pub fn is_cancelled(error: &Error) -> bool {
    matches!(
        find(error),
        Some(CrudError::Cancelled | CrudError::DeadlineExceeded)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn classify_through_context() {
        let error = Error::from(CrudError::NotFound {
            table: "account".into(),
        });
        assert_eq!(error.to_string(), "no such record in `account`");
        assert!(is_not_found(&error));
        let error = Err::<(), _>(error).context("while loading").unwrap_err();
        assert!(is_not_found(&error));
        assert!(!is_metadata_error(&error));
        assert!(!is_cancelled(&error));

        let error = Error::msg("connection reset");
        assert!(!is_not_found(&error));
        assert!(is_cancelled(&Error::from(CrudError::DeadlineExceeded)));
    }
}
