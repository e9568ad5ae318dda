//! Fragment validation errors.

use thiserror::Error;

/// A rendered fragment failed target-grammar validation.
///
/// The offending fragment travels with the error verbatim so the caller
/// can show the text that was rejected; nothing from a failed fragment is
/// ever admitted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The fragment is not well-formed at the top level.
    #[error("fragment syntax error at byte {offset}: {message}")]
    Syntax {
        offset: usize,
        message: String,
        fragment: String,
    },
    /// A well-formed construct of a kind the emitter does not admit.
    #[error("unsupported top-level declaration `{construct}` at byte {offset}")]
    Unsupported {
        construct: String,
        offset: usize,
        fragment: String,
    },
}

impl CompileError {
    /// The rejected fragment, verbatim.
    pub fn fragment(&self) -> &str {
        match self {
            CompileError::Syntax { fragment, .. } | CompileError::Unsupported { fragment, .. } => {
                fragment
            }
        }
    }
}
