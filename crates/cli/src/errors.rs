//! CLI error types rendered through miette diagnostics

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the semrel CLI
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Release(#[from] semrel_core::Error),

    #[error("No container runtime available")]
    #[diagnostic(
        code(semrel::cli::no_runtime),
        help("Rebuild with the 'dagger-backend' feature, or pass --print-spec to emit the spec")
    )]
    NoRuntime,

    #[error("Failed to render the container specification")]
    #[diagnostic(code(semrel::cli::render))]
    Render {
        #[source]
        source: serde_json::Error,
    },
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_error_is_transparent() {
        let err: CliError = semrel_core::Error::execution("engine gone").into();
        assert_eq!(err.to_string(), "Container execution failed: engine gone");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("semrel::runtime::execution"));
    }

    #[test]
    fn test_no_runtime_has_help() {
        let err = CliError::NoRuntime;
        assert!(err.help().is_some());
    }
}
