use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a model descriptor and a scored
/// prediction batch.
///
/// Descriptor and capability errors are caller mistakes and are raised
/// immediately. Process errors always carry the command and the captured
/// output so a failing toolchain can be diagnosed from the message alone.
#[derive(Debug, Error)]
pub enum PorterError {
    #[error("the {kind} descriptor is not fitted: missing `{field}`")]
    NotFitted { kind: String, field: &'static str },

    #[error("invalid {kind} descriptor: {reason}")]
    InvalidDescriptor { kind: String, reason: String },

    #[error("{what} is not supported for the model `{kind}`")]
    NotSupported { kind: String, what: String },

    #[error("required dependency `{binary}` for {language} is missing")]
    MissingDependency { language: String, binary: String },

    #[error("command `{command}` failed to compile the generated code:\n\n{output}")]
    CompilationFailed { command: String, output: String },

    #[error("generated method body is too large for the compiler (`{command}`):\n\n{output}")]
    CodeTooLarge { command: String, output: String },

    #[error("generated code has too many constants for the compiler (`{command}`):\n\n{output}")]
    TooManyConstants { command: String, output: String },

    #[error("command `{command}` failed after {attempts} attempts:\n\n{output}")]
    ExecutionFailed {
        command: String,
        attempts: u32,
        output: String,
    },

    #[error("command `{command}` printed malformed output ({reason}):\n\n{output}")]
    MalformedOutput {
        command: String,
        output: String,
        reason: String,
    },

    #[error("converter produced `{text}` for {value}, which is not a valid JSON number")]
    InvalidNumber { value: f64, text: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cannot download `{url}`: {reason}")]
    Download { url: String, reason: String },

    #[error("{action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl PorterError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PorterError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// True for every failure of the compile step, including the refined
    /// compiler-limit kinds.
    pub fn is_compilation_failure(&self) -> bool {
        matches!(
            self,
            PorterError::CompilationFailed { .. }
                | PorterError::CodeTooLarge { .. }
                | PorterError::TooManyConstants { .. }
        )
    }
}

pub type Result<T, E = PorterError> = std::result::Result<T, E>;
