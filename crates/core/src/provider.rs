//! Git provider selection.

use std::fmt;

/// Git hosting provider whose token semantic-release receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GitProvider {
    /// GitHub; token exposed as `GH_TOKEN`.
    #[default]
    GitHub,
    /// GitLab; token exposed as `GL_TOKEN`.
    GitLab,
}

impl GitProvider {
    /// Map a provider name to a provider.
    ///
    /// Only the exact string `"github"` selects GitHub. Every other value,
    /// including unknown providers and differently-cased spellings, selects
    /// GitLab.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == "github" {
            Self::GitHub
        } else {
            if name != "gitlab" {
                tracing::debug!(provider = name, "Unrecognized provider, using GL_TOKEN");
            }
            Self::GitLab
        }
    }

    /// Environment variable semantic-release reads the token from.
    #[must_use]
    pub const fn token_env_var(self) -> &'static str {
        match self {
            Self::GitHub => "GH_TOKEN",
            Self::GitLab => "GL_TOKEN",
        }
    }
}

impl From<&str> for GitProvider {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for GitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
            Self::GitLab => write!(f, "gitlab"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_selects_gh_token() {
        assert_eq!(GitProvider::from_name("github"), GitProvider::GitHub);
        assert_eq!(GitProvider::from_name("github").token_env_var(), "GH_TOKEN");
    }

    #[test]
    fn test_everything_else_selects_gl_token() {
        for name in ["gitlab", "bitbucket", "", "GitHub", "Github", " github"] {
            assert_eq!(
                GitProvider::from_name(name).token_env_var(),
                "GL_TOKEN",
                "provider {name:?}"
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for provider in [GitProvider::GitHub, GitProvider::GitLab] {
            assert_eq!(GitProvider::from(provider.to_string().as_str()), provider);
        }
    }
}
