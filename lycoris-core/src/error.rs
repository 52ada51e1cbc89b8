use thiserror::Error;

/// Typed failure surfaced by every public runtime operation.
///
/// Display strings lead with the error kind so the text appended to the
/// output buffer reads like `DomainError: division by zero`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("SyntaxError: {0}")]
    Syntax(String),

    #[error("SyntaxError: {message} (offset {offset})")]
    SyntaxAt { offset: usize, message: String },

    #[error("UnknownWord: {0}")]
    UnknownWord(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("ArityError: {0}")]
    Arity(String),

    #[error("IndexError: index {index} out of range for length {len}")]
    Index { index: i64, len: usize },

    #[error("DomainError: {0}")]
    Domain(String),

    #[error("LimitExceeded: {0}")]
    Limit(String),

    #[error("NameConflict: '{0}' is a built-in word")]
    NameConflict(String),

    #[error("ProtectedBuiltin: cannot remove built-in word '{0}'")]
    ProtectedBuiltin(String),

    #[error("InvalidName: {0}")]
    InvalidName(String),

    #[error("NotFound: no user word named '{0}'")]
    NotFound(String),

    #[error("CorruptState: {0}")]
    CorruptState(String),

    /// Reserved for hosts that pre-validate allocations; the default global
    /// allocator aborts instead of reporting failure.
    #[error("OutOfMemory: allocation refused by host")]
    OutOfMemory,
}
