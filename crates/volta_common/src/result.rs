//! Common result and error types for the Volta toolchain.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error — a bug in Volta or a
/// caller handing a stage data that an earlier stage was required to
/// reject — never a user-facing condition. User errors are reported
/// through the diagnostics sink and the operation still returns `Ok`.
pub type VoltaResult<T> = Result<T, InternalError>;

/// An internal compiler error.
///
/// These should never surface during normal operation; one occurring
/// means a logic error upstream that must be fixed, not reported to the
/// user as their mistake.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of what went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("ring corrupted");
        assert_eq!(format!("{err}"), "internal compiler error: ring corrupted");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "bad row".to_string().into();
        assert_eq!(err.message, "bad row");
    }

    #[test]
    fn result_paths() {
        let ok: VoltaResult<u32> = Ok(7);
        assert_eq!(ok.ok(), Some(7));
        let err: VoltaResult<u32> = Err(InternalError::new("nope"));
        assert!(err.is_err());
    }
}
