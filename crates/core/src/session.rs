//! Release sessions: patch a configuration, then describe the release run.

use crate::command::ReleaseCommand;
use crate::config::{BranchPatch, ConfigPatch, RELEASERC_FILE, ReleaseConfig};
use crate::container::{ContainerSpec, SecretHandle};
use crate::error::{Error, Result};
use crate::provider::GitProvider;
use chrono::NaiveTime;
use std::path::{Path, PathBuf};

/// Published image that ships semantic-release and its common plugins.
pub const SEMANTIC_RELEASE_IMAGE: &str = "hoppr/semantic-release";

/// Where the source tree is placed inside the container.
pub const SOURCE_MOUNT: &str = "/src";

/// Flags controlling a release run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Let semantic-release verify it runs in CI (omits `--no-ci`).
    pub check_if_ci: bool,
    /// Pass `--dry-run`.
    pub dry_run: bool,
    /// Base image override.
    pub image: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            check_if_ci: false,
            dry_run: true,
            image: None,
        }
    }
}

impl ReleaseOptions {
    fn image(&self) -> &str {
        self.image.as_deref().unwrap_or(SEMANTIC_RELEASE_IMAGE)
    }
}

/// State carried between configuring and running a release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSession {
    config: Option<PathBuf>,
    modified_config: Option<String>,
}

impl ReleaseSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration file the session was patched from.
    #[must_use]
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// The serialized, patched configuration, if any.
    #[must_use]
    pub fn modified_config(&self) -> Option<&str> {
        self.modified_config.as_deref()
    }

    /// Load `file` and add `branch` to its `branches` for this run.
    ///
    /// The file on disk is never modified. On error the session is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid JSON.
    pub async fn with_config(
        &mut self,
        file: impl AsRef<Path>,
        branch: Option<&str>,
    ) -> Result<&mut Self> {
        self.with_config_patch(file, &ConfigPatch::branch(branch)).await
    }

    /// Load `file` and apply every modification in `patch`.
    ///
    /// # Errors
    ///
    /// See [`ReleaseSession::with_config`].
    pub async fn with_config_patch(
        &mut self,
        file: impl AsRef<Path>,
        patch: &ConfigPatch,
    ) -> Result<&mut Self> {
        let path = file.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::config_read(path, e))?;

        let serialized = patch_contents(&contents, Some(path.to_path_buf()), patch)?;
        self.config = Some(path.to_path_buf());
        self.modified_config = Some(serialized);
        Ok(self)
    }

    /// Patch an in-memory configuration document.
    ///
    /// Any previously recorded configuration path is cleared, since the
    /// patch no longer comes from that file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if `contents` is not valid JSON.
    pub fn with_config_contents(
        &mut self,
        contents: &str,
        branch: Option<&str>,
    ) -> Result<&mut Self> {
        let serialized = patch_contents(contents, None, &ConfigPatch::branch(branch))?;
        self.config = None;
        self.modified_config = Some(serialized);
        Ok(self)
    }

    /// Describe a container that runs semantic-release on `dir`.
    ///
    /// The token is exposed as `GH_TOKEN` for `"github"` and as `GL_TOKEN`
    /// for any other provider. Nothing runs until the returned spec is
    /// handed to a [`ContainerRuntime`](crate::runtime::ContainerRuntime).
    #[must_use]
    pub fn release(
        &self,
        dir: impl Into<PathBuf>,
        provider: &str,
        token: SecretHandle,
        options: &ReleaseOptions,
    ) -> ContainerSpec {
        self.release_at(dir, provider, token, options, chrono::Local::now().time())
    }

    /// Like [`ReleaseSession::release`], stamping `TIME` from `now`.
    #[must_use]
    pub fn release_at(
        &self,
        dir: impl Into<PathBuf>,
        provider: &str,
        token: SecretHandle,
        options: &ReleaseOptions,
        now: NaiveTime,
    ) -> ContainerSpec {
        let provider = GitProvider::from_name(provider);
        let command = ReleaseCommand::new(options.check_if_ci, options.dry_run);
        tracing::info!(
            command = %command,
            provider = %provider,
            "Executing Semantic Release with command: {:?}",
            command.args()
        );

        let mut ctr = ContainerSpec::builder(options.image())
            .with_env_variable("TIME", now.format("%H%M%S").to_string())
            .with_secret_variable(provider.token_env_var(), token)
            .with_directory(SOURCE_MOUNT, dir)
            .with_workdir(SOURCE_MOUNT);

        if let Some(config) = &self.modified_config {
            ctr = ctr
                .without_file(RELEASERC_FILE)
                .with_new_file(RELEASERC_FILE, config.clone());
        }

        ctr.with_exec(command.into_args()).build()
    }
}

fn patch_contents(contents: &str, path: Option<PathBuf>, patch: &ConfigPatch) -> Result<String> {
    let mut config = ReleaseConfig::parse_from(contents, path)?;
    if let BranchPatch::Appended(branch) = config.apply(patch)? {
        tracing::debug!(branches = ?config.branch_names(), "Branch '{branch}' appended");
    }
    config.to_json_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{FileState, Step};

    fn token() -> SecretHandle {
        SecretHandle::new("token", "pat-123")
    }

    fn fixed_time() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 5, 7).unwrap()
    }

    #[test]
    fn test_release_options_default() {
        let options = ReleaseOptions::default();
        assert!(!options.check_if_ci);
        assert!(options.dry_run);
        assert_eq!(options.image(), SEMANTIC_RELEASE_IMAGE);
    }

    #[test]
    fn test_release_spec_without_config() {
        let session = ReleaseSession::new();
        let spec = session.release_at(
            "/work/app",
            "github",
            token(),
            &ReleaseOptions::default(),
            fixed_time(),
        );

        let expected = ContainerSpec::builder(SEMANTIC_RELEASE_IMAGE)
            .with_env_variable("TIME", "090507")
            .with_secret_variable("GH_TOKEN", token())
            .with_directory("/src", "/work/app")
            .with_workdir("/src")
            .with_exec(["semantic-release", "--no-ci", "--dry-run"])
            .build();
        assert_eq!(spec, expected);
        assert_eq!(spec.file_state(RELEASERC_FILE), FileState::Untouched);
    }

    #[test]
    fn test_release_spec_with_modified_config() {
        let mut session = ReleaseSession::new();
        session
            .with_config_contents(r#"{"branches":["main"]}"#, Some("feat"))
            .unwrap();

        let spec = session.release_at(
            "/work/app",
            "gitlab",
            token(),
            &ReleaseOptions::default(),
            fixed_time(),
        );

        assert_eq!(spec.secret_variables(), vec!["GL_TOKEN"]);
        assert_eq!(
            spec.file_state(RELEASERC_FILE),
            FileState::Written(r#"{"branches":["main",{"name":"feat"}]}"#)
        );
        let steps = spec.steps();
        assert_eq!(
            steps[4],
            Step::WithoutFile {
                path: RELEASERC_FILE.to_string()
            }
        );
        assert!(matches!(steps[5], Step::NewFile { .. }));
        assert!(matches!(steps.last(), Some(Step::Exec { .. })));
    }

    #[test]
    fn test_release_flags_and_image() {
        let session = ReleaseSession::new();
        let options = ReleaseOptions {
            check_if_ci: true,
            dry_run: false,
            image: Some("ghcr.io/acme/semrel:1".to_string()),
        };
        let spec = session.release_at(".", "bitbucket", token(), &options, fixed_time());

        assert_eq!(spec.image(), "ghcr.io/acme/semrel:1");
        assert_eq!(spec.execs(), vec![&["semantic-release".to_string()][..]]);
        assert_eq!(spec.secret_variables(), vec!["GL_TOKEN"]);
    }

    #[test]
    fn test_time_marker_format() {
        let spec =
            ReleaseSession::new().release(".", "github", token(), &ReleaseOptions::default());
        let time = spec.env("TIME").unwrap();
        assert_eq!(time.len(), 6);
        assert!(time.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_invalid_contents_leave_session_unset() {
        let mut session = ReleaseSession::new();
        let err = session.with_config_contents("not json", Some("feat")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert_eq!(session.modified_config(), None);
        assert_eq!(session, ReleaseSession::new());
    }

    #[tokio::test]
    async fn test_contents_replace_file_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(RELEASERC_FILE);
        std::fs::write(&path, r#"{"branches":["main"]}"#).unwrap();

        let mut session = ReleaseSession::new();
        session.with_config(&path, Some("from-file")).await.unwrap();
        assert_eq!(session.config(), Some(path.as_path()));

        session
            .with_config_contents(r#"{"branches":["dev"]}"#, Some("inline"))
            .unwrap();
        assert_eq!(session.config(), None);
        assert_eq!(
            session.modified_config(),
            Some(r#"{"branches":["dev",{"name":"inline"}]}"#)
        );
    }

    #[test]
    fn test_with_config_contents_chains() {
        let mut session = ReleaseSession::new();
        let spec = session
            .with_config_contents(r#"{"branches":[]}"#, None)
            .unwrap()
            .release_at(".", "github", token(), &ReleaseOptions::default(), fixed_time());
        assert_eq!(
            spec.file_state(RELEASERC_FILE),
            FileState::Written(r#"{"branches":[]}"#)
        );
    }
}
