use std::io;

use thiserror::Error;

/// Library-wide error type for simbatch operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A mandatory template directive is absent.
    #[error("Missing directive '%{0}%' in template")]
    MissingDirective(&'static str),

    /// A directive is present but its arguments do not parse.
    #[error("Malformed directive '%{directive}%': {details}")]
    MalformedDirective { directive: &'static str, details: String },

    /// Scheduler kind is not in the closed set.
    #[error("Unknown scheduler '{0}'. Use one of: SGE, SLURM")]
    UnknownScheduler(String),

    /// No output directory resolvable from the command line or the template.
    #[error("Output path not defined. Pass --output or add an %output begin%...%output end% block")]
    MissingOutputPath,

    /// No job template applicable to the resolved scheduler.
    #[error(
        "No job template for scheduler '{scheduler}'. Add a %job begin% or %{scheduler} job begin% block"
    )]
    MissingTemplate { scheduler: String },

    /// Preamble execution or expression evaluation failed.
    #[error("Failed to evaluate '{expression}' at index {index}: {reason}")]
    Expression { expression: String, index: i64, reason: String },

    /// The external submit command could not be launched.
    #[error("Failed to run '{command}': {details}")]
    SubmitInvocation { command: String, details: String },
}
