use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, SeqError>;

/// Failure kinds surfaced by sequence construction and enumeration.
///
/// Construction-time kinds (`MissingArgument`, `OutOfRange`) are returned before
/// any sequence exists. Everything else surfaces at the exact pull (or eager
/// call) that triggers it.
#[derive(Debug, Error)]
pub enum SeqError {
    #[error("missing required argument '{name}'")]
    MissingArgument { name: &'static str },

    #[error("argument '{name}' out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("cannot cast value of type {from} to {to}")]
    InvalidCast {
        from: &'static str,
        to: &'static str,
    },

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    // Raised by caller-supplied fallible closures; passed through untouched.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl SeqError {
    pub fn missing(name: &'static str) -> Self {
        SeqError::MissingArgument { name }
    }

    pub fn out_of_range(name: &'static str, value: impl Into<i64>) -> Self {
        SeqError::OutOfRange {
            name,
            value: value.into(),
        }
    }

    pub fn invalid_op(msg: impl Into<String>) -> Self {
        SeqError::InvalidOperation(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        SeqError::Overflow(msg.into())
    }

    /// Wrap an arbitrary error raised inside a caller-supplied function.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SeqError::Custom(Box::new(err))
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, SeqError::InvalidOperation(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, SeqError::Overflow(_))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SeqError::OutOfRange { .. })
    }
}

/// Reject a negative count at construction time.
pub fn check_non_negative(name: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(SeqError::out_of_range(name, value));
    }
    Ok(())
}
