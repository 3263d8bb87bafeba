//! The semantic-release command line.

use std::fmt;

/// Name of the release tool binary inside the image.
pub const SEMANTIC_RELEASE_BIN: &str = "semantic-release";

/// An immutable semantic-release invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCommand {
    args: Vec<String>,
}

impl ReleaseCommand {
    /// Build the command for the given flags.
    ///
    /// `--no-ci` is added unless CI detection is requested, then `--dry-run`
    /// when `dry_run` is set.
    #[must_use]
    pub fn new(check_if_ci: bool, dry_run: bool) -> Self {
        let mut args = vec![SEMANTIC_RELEASE_BIN.to_string()];
        if !check_if_ci {
            tracing::debug!(option = "--no-ci", "Added option to 'semantic-release' command");
            args.push("--no-ci".to_string());
        }
        if dry_run {
            tracing::debug!(option = "--dry-run", "Added option to 'semantic-release' command");
            args.push("--dry-run".to_string());
        }
        Self { args }
    }

    /// All tokens, tool name first.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Consume the command, returning its tokens.
    #[must_use]
    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Whether this is a dry run.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.args.iter().any(|a| a == "--dry-run")
    }
}

impl fmt::Display for ReleaseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// Build the semantic-release argument list.
#[must_use]
pub fn construct_cmd(check_if_ci: bool, dry_run: bool) -> Vec<String> {
    ReleaseCommand::new(check_if_ci, dry_run).into_args()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_local_dry_run() {
        assert_eq!(
            construct_cmd(false, true),
            vec!["semantic-release", "--no-ci", "--dry-run"]
        );
    }

    #[test]
    fn test_ci_release() {
        assert_eq!(construct_cmd(true, false), vec!["semantic-release"]);
    }

    #[test]
    fn test_local_release() {
        assert_eq!(construct_cmd(false, false), vec!["semantic-release", "--no-ci"]);
    }

    #[test]
    fn test_ci_dry_run() {
        assert_eq!(
            construct_cmd(true, true),
            vec!["semantic-release", "--dry-run"]
        );
    }

    #[test]
    fn test_display_joins_tokens() {
        let cmd = ReleaseCommand::new(false, true);
        assert_eq!(cmd.to_string(), "semantic-release --no-ci --dry-run");
        assert!(cmd.is_dry_run());
        assert!(!ReleaseCommand::new(false, false).is_dry_run());
    }
}
