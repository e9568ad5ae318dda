//! Template expansion errors.
//!
//! Every variant is fatal to the render that raised it; no partial output
//! is ever returned alongside an error.

use thiserror::Error;

/// A template failed to expand.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Malformed template syntax (unclosed action, unbalanced blocks, …).
    #[error("template syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    /// An action invoked a function that is not bound in the table.
    #[error("unknown template function `{name}`")]
    UnknownFunction { name: String },
    /// A path referred to data absent from the context.
    #[error("template context has no field `{path}`")]
    MissingField { path: String },
    /// A substitution resolved to a list or map.
    #[error("template field `{path}` is not a scalar")]
    NotScalar { path: String },
    /// An `each` path resolved to something that cannot be iterated.
    #[error("template field `{path}` is not a list")]
    NotList { path: String },
    /// A bound function reported a domain error.
    #[error("template function `{name}` failed: {message}")]
    Apply { name: String, message: String },
}

impl TemplateError {
    /// Convenience constructor for bound functions reporting failure.
    pub fn apply(name: impl Into<String>, message: impl Into<String>) -> Self {
        TemplateError::Apply {
            name: name.into(),
            message: message.into(),
        }
    }
}
