//! The seam between container descriptions and whatever runs them.

use crate::container::ContainerSpec;
use crate::error::Result;
use async_trait::async_trait;

/// Output of a finished container run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code of the final command.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl RunOutput {
    /// Whether the command exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes [`ContainerSpec`]s.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Materialize `spec` and run it to completion.
    async fn run(&self, spec: &ContainerSpec) -> Result<RunOutput>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
