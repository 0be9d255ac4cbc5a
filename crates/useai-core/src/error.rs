//! Error types for the use-ai pipeline

use std::path::PathBuf;
use useai_client::ClientError;
use useai_syntax::SyntaxError;

/// Configuration errors, raised once at setup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No credential in options or environment
    #[error("use-ai: api_key is required; pass it in the options or set OPENROUTER_API_KEY")]
    MissingApiKey,

    /// Default temperature outside 0..=2
    #[error("temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f64),

    /// Unrecognized option value
    #[error("invalid value for `{key}`: {value}")]
    InvalidValue {
        /// Option name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// Configuration file unreadable
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the options
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Generation client could not be created
    #[error("client setup failed: {0}")]
    Client(#[from] ClientError),
}

/// Generated text could not be spliced
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// Text does not parse as a function body
    #[error("generated code is not a valid function body: {0}")]
    InvalidCode(#[from] SyntaxError),
}

/// Failure generating one function
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Generation service failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Generated code was rejected
    #[error(transparent)]
    Splice(#[from] SpliceError),
}

/// Failure transforming a source file
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Source does not parse
    #[error("source parse failed: {0}")]
    Syntax(#[from] SyntaxError),

    /// A claimed function could not be generated
    #[error("use-ai: failed to generate `{name}`: {source}")]
    Function {
        /// Function display name
        name: String,
        /// Cause
        #[source]
        source: GenerateError,
    },

    /// Runtime for blocking use could not start
    #[error("runtime initialization failed: {0}")]
    Runtime(#[source] std::io::Error),
}

impl TransformError {
    /// Wrap a per-function failure
    pub fn function(name: impl Into<String>, source: GenerateError) -> Self {
        Self::Function {
            name: name.into(),
            source,
        }
    }

    /// Name of the failed function, if the error concerns one
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::Function { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_error_names_the_function() {
        let err = TransformError::function(
            "add",
            GenerateError::Splice(SpliceError::InvalidCode(SyntaxError::syntax(1, 8, "unexpected `(`"))),
        );
        assert_eq!(err.function_name(), Some("add"));
        assert!(err.to_string().contains("`add`"));
    }
}
