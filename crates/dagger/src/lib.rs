//! Dagger runtime for semrel
//!
//! This crate provides the `DaggerRuntime` implementation that materializes
//! [`ContainerSpec`]s through the Dagger SDK and runs them to completion.

use async_trait::async_trait;
use dagger_sdk::{Config, Container, Query, connect_opts};
use semrel_core::{ContainerRuntime, ContainerSpec, Error, Result, RunOutput, Step};
use std::sync::{Arc, Mutex};

type DaggerReport = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dagger runtime - runs container specs on a Dagger engine
#[derive(Debug, Clone, Default)]
pub struct DaggerRuntime {
    config: Option<RuntimeConfig>,
}

/// Connection settings passed to the Dagger SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Milliseconds to wait for the engine session to start.
    pub timeout_ms: Option<u64>,
}

impl DaggerRuntime {
    /// Runtime using the SDK's default connection settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime with explicit connection settings.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    fn sdk_config(&self) -> Config {
        let mut cfg = Config::default();
        if let Some(timeout) = self.config.as_ref().and_then(|c| c.timeout_ms) {
            cfg.timeout_ms = timeout;
        }
        cfg
    }
}

/// Replay `spec`'s steps onto a fresh Dagger container.
fn build_container(client: &Query, spec: &ContainerSpec) -> Container {
    let mut container = client.container().from(spec.image());

    for step in spec.steps() {
        container = match step {
            Step::EnvVariable { name, value } => container.with_env_variable(name, value),
            Step::SecretVariable { name, secret } => {
                let dagger_secret = client.set_secret(secret.name(), secret.expose());
                container.with_secret_variable(name, dagger_secret)
            }
            Step::Directory { path, source } => {
                let host_dir = client.host().directory(source.to_string_lossy().to_string());
                container.with_directory(path, host_dir)
            }
            Step::Workdir { path } => container.with_workdir(path),
            Step::WithoutFile { path } => container.without_file(path),
            Step::NewFile { path, contents } => container.with_new_file(path, contents),
            Step::Exec { args } => container.with_exec(args.clone()),
        };
    }

    container
}

#[async_trait]
impl ContainerRuntime for DaggerRuntime {
    async fn run(&self, spec: &ContainerSpec) -> Result<RunOutput> {
        if spec.execs().is_empty() {
            return Err(Error::execution(
                "Container spec has no command to run".to_string(),
            ));
        }

        tracing::debug!(
            image = spec.image(),
            steps = spec.steps().len(),
            secrets = ?spec.secret_variables(),
            "Running container spec on Dagger"
        );

        // Result store: (exit_code, stdout, stderr)
        type ResultType = (i32, String, String);
        let result_store: Arc<Mutex<Option<std::result::Result<ResultType, DaggerReport>>>> =
            Arc::new(Mutex::new(None));
        let result_store_clone = result_store.clone();
        let spec = spec.clone();

        connect_opts(self.sdk_config(), move |client| {
            let spec = spec.clone();
            let result_store = result_store_clone.clone();

            async move {
                let exec = build_container(&client, &spec);

                let stdout_res = exec.stdout().await;
                let stderr_res = exec.stderr().await;
                let exit_code_res = exec.exit_code().await;

                let res = match (stdout_res, stderr_res, exit_code_res) {
                    (Ok(stdout), Ok(stderr), Ok(exit_code)) => Ok((
                        i32::try_from(exit_code).unwrap_or(-1),
                        stdout,
                        stderr,
                    )),
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e.into()),
                };

                if let Ok(mut guard) = result_store.lock() {
                    *guard = Some(res);
                }
                Ok(())
            }
        })
        .await
        .map_err(|err| Error::execution(format!("Dagger runtime failed: {err}")))?;

        let mut guard = result_store
            .lock()
            .map_err(|_| Error::execution("Failed to acquire lock on run result".to_string()))?;

        let inner_result = guard.take().ok_or_else(|| {
            Error::execution("Container finished but produced no result".to_string())
        })?;

        let (exit_code, stdout, stderr) = inner_result
            .map_err(|e: DaggerReport| Error::execution(format!("Dagger execution failed: {e}")))?;

        tracing::info!(exit_code, "semantic-release container finished");

        Ok(RunOutput {
            exit_code,
            stdout,
            stderr,
        })
    }

    fn name(&self) -> &'static str {
        "dagger"
    }
}
