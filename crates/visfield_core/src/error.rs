//! Error types for text field operations.
use thiserror::Error;

/// Errors surfaced by the public text field API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Invalid argument: {name} must be >= 0 (got {value})")]
    InvalidArgument { name: &'static str, value: i64 },

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl FieldError {
    /// Reject a negative index argument, returning it as `usize` otherwise.
    pub(crate) fn check_index(name: &'static str, value: i64) -> Result<usize, Self> {
        usize::try_from(value).map_err(|_| Self::InvalidArgument { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::FieldError;

    #[test]
    fn check_index_accepts_zero_and_positive() {
        assert_eq!(FieldError::check_index("pos", 0), Ok(0));
        assert_eq!(FieldError::check_index("pos", 17), Ok(17));
    }

    #[test]
    fn check_index_rejects_negative_with_name() {
        let err = FieldError::check_index("selectionStart", -1).expect_err("negative");
        assert_eq!(
            err,
            FieldError::InvalidArgument {
                name: "selectionStart",
                value: -1,
            }
        );
        assert!(err.to_string().contains("selectionStart"));
    }
}
