//! The `semrel release` command.
//!
//! Builds a release session from the command line, optionally patches the
//! release configuration, and either prints the resulting container
//! specification or hands it to a container runtime.

use crate::cli::ReleaseArgs;
use crate::errors::{CliError, CliResult};
use semrel_core::{
    ConfigPatch, ContainerRuntime, ContainerSpec, ReleaseOptions, ReleaseSession, RunOutput,
    SecretHandle,
};
use tracing::instrument;

/// Name under which the provider token is registered with the runtime.
pub const TOKEN_SECRET_NAME: &str = "semrel-provider-token";

/// What `semrel release` produced.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The rendered container specification (`--print-spec`).
    Spec(String),
    /// Output of the semantic-release container.
    Ran(RunOutput),
}

impl ReleaseOutcome {
    /// Process exit code for this outcome.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Spec(_) => 0,
            Self::Ran(output) => output.exit_code,
        }
    }
}

impl From<&ReleaseArgs> for ReleaseOptions {
    fn from(args: &ReleaseArgs) -> Self {
        Self {
            check_if_ci: args.check_if_ci,
            dry_run: !args.no_dry_run,
            image: args.image.clone(),
        }
    }
}

/// Build the container specification described by `args`.
#[instrument(skip_all, fields(provider = %args.provider, dir = %args.dir.display()))]
pub async fn build_release_spec(args: &ReleaseArgs) -> CliResult<ContainerSpec> {
    let mut session = ReleaseSession::new();

    if let Some(config) = &args.config {
        let patch = ConfigPatch::branch(args.branch.as_deref())
            .with_remove_git_provider(args.remove_git_provider);
        session.with_config_patch(config, &patch).await?;
    }

    let token = SecretHandle::new(TOKEN_SECRET_NAME, args.token.clone());
    Ok(session.release(
        args.dir.clone(),
        &args.provider,
        token,
        &ReleaseOptions::from(args),
    ))
}

/// Render a specification as pretty JSON; secrets appear by name only.
pub fn render_spec(spec: &ContainerSpec) -> CliResult<String> {
    serde_json::to_string_pretty(spec).map_err(|source| CliError::Render { source })
}

/// Execute `semrel release`.
pub async fn execute_release(
    args: &ReleaseArgs,
    runtime: Option<&dyn ContainerRuntime>,
) -> CliResult<ReleaseOutcome> {
    let spec = build_release_spec(args).await?;

    if args.print_spec {
        return render_spec(&spec).map(ReleaseOutcome::Spec);
    }

    let runtime = runtime.ok_or(CliError::NoRuntime)?;
    tracing::info!(
        runtime = runtime.name(),
        image = spec.image(),
        "Starting semantic-release container"
    );
    let output = runtime.run(&spec).await?;
    if !output.success() {
        tracing::warn!(
            exit_code = output.exit_code,
            "semantic-release exited with a failure status"
        );
    }
    Ok(ReleaseOutcome::Ran(output))
}
