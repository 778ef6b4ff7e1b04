//! Rendering error types

use thiserror::Error;

/// Errors raised while loading templates or producing artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// A placeholder has no value in the render context.
    #[error("template placeholder '{placeholder}' has no value")]
    TemplateRender { placeholder: String },
    /// The template text itself cannot be parsed.
    #[error("malformed template '{name}': {reason}")]
    MalformedTemplate { name: String, reason: String },
    /// No built-in template has this name.
    #[error("unknown built-in template '{0}'")]
    UnknownTemplate(String),
    /// The flavor of a template file could not be inferred.
    #[error("cannot infer flavor for template '{0}', expected a .c, .h or .py file")]
    UnknownFlavor(String),
    /// Reading a template or writing an artifact failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;
