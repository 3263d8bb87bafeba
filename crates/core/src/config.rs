//! semantic-release configuration documents.
//!
//! A [`ReleaseConfig`] wraps the parsed `.releaserc.json` as a generic JSON
//! object so that keys semrel does not understand pass through untouched and
//! in their original order. Only `branches` and `plugins` are ever modified.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Conventional file name of the semantic-release configuration.
pub const RELEASERC_FILE: &str = ".releaserc.json";

/// Plugins that talk to a git provider and require a token.
pub const GIT_PROVIDER_PLUGINS: [&str; 2] =
    ["@semantic-release/github", "@semantic-release/gitlab"];

const BRANCHES_KEY: &str = "branches";
const PLUGINS_KEY: &str = "plugins";

/// Outcome of [`ReleaseConfig::add_branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchPatch {
    /// The branch descriptor was appended to `branches`.
    Appended(String),
    /// No branch name was given, or it was blank.
    NoBranch,
    /// The document has no `branches` key, so nothing was appended.
    MissingBranches(String),
}

/// Modifications applied to a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    /// Branch to add to `branches` for the duration of the run.
    pub branch: Option<String>,
    /// Strip the GitHub/GitLab plugins, for runs without a provider token.
    pub remove_git_provider: bool,
}

impl ConfigPatch {
    /// Patch that only adds `branch`.
    #[must_use]
    pub fn branch(branch: Option<&str>) -> Self {
        Self {
            branch: branch.map(str::to_string),
            remove_git_provider: false,
        }
    }

    /// Also strip the git provider plugins.
    #[must_use]
    pub fn with_remove_git_provider(mut self, remove: bool) -> Self {
        self.remove_git_provider = remove;
        self
    }
}

/// A parsed semantic-release configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseConfig {
    root: Map<String, Value>,
}

impl ReleaseConfig {
    /// Parse a configuration document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if `contents` is not valid JSON and
    /// [`Error::InvalidConfig`] if the top-level value is not an object.
    pub fn parse(contents: &str) -> Result<Self> {
        Self::parse_from(contents, None)
    }

    pub(crate) fn parse_from(contents: &str, path: Option<PathBuf>) -> Result<Self> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| Error::config_parse(path, e))?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(Error::invalid_config(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// The underlying JSON object.
    #[must_use]
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Whether the document declares a `branches` key.
    #[must_use]
    pub fn has_branches(&self) -> bool {
        self.root.contains_key(BRANCHES_KEY)
    }

    /// Names of the configured release branches, in order.
    ///
    /// Both bare string entries and `{ "name": ... }` objects are recognized.
    #[must_use]
    pub fn branch_names(&self) -> Vec<&str> {
        self.root
            .get(BRANCHES_KEY)
            .and_then(Value::as_array)
            .map(|branches| branches.iter().filter_map(branch_name).collect())
            .unwrap_or_default()
    }

    /// Whether `name` is already listed in `branches`.
    #[must_use]
    pub fn contains_branch(&self, name: &str) -> bool {
        self.branch_names().contains(&name)
    }

    /// Append `{ "name": <branch> }` to `branches`.
    ///
    /// The branch name is trimmed; blank names are ignored. A document
    /// without `branches` is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `branches` exists but is not an
    /// array.
    pub fn add_branch(&mut self, branch: Option<&str>) -> Result<BranchPatch> {
        let Some(name) = branch.map(str::trim).filter(|b| !b.is_empty()) else {
            return Ok(BranchPatch::NoBranch);
        };

        tracing::info!(branch = name, "Adding branch '{name}' to {RELEASERC_FILE} temporarily");

        match self.root.get_mut(BRANCHES_KEY) {
            None => {
                tracing::warn!(
                    branch = name,
                    "No 'branches' key in {RELEASERC_FILE}; branch not added"
                );
                Ok(BranchPatch::MissingBranches(name.to_string()))
            }
            Some(Value::Array(branches)) => {
                for existing in branches.iter().filter_map(branch_name) {
                    tracing::debug!(branch = existing, "Branch found");
                }
                let mut descriptor = Map::new();
                descriptor.insert("name".to_string(), Value::String(name.to_string()));
                branches.push(Value::Object(descriptor));
                Ok(BranchPatch::Appended(name.to_string()))
            }
            Some(other) => Err(Error::invalid_config(format!(
                "'branches' must be an array, found {}",
                json_kind(other)
            ))),
        }
    }

    /// Remove `@semantic-release/github` and `@semantic-release/gitlab`
    /// from `plugins`, returning how many entries were removed.
    ///
    /// Plugins may be listed as a bare name or as a `[name, options]` pair.
    pub fn remove_git_provider_plugins(&mut self) -> usize {
        let Some(Value::Array(plugins)) = self.root.get_mut(PLUGINS_KEY) else {
            return 0;
        };

        let before = plugins.len();
        plugins.retain(|plugin| {
            let keep = plugin_name(plugin).is_none_or(|name| !GIT_PROVIDER_PLUGINS.contains(&name));
            if !keep {
                tracing::debug!(plugin = ?plugin_name(plugin), "Removing git provider plugin");
            }
            keep
        });
        before - plugins.len()
    }

    /// Apply every modification in `patch`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ReleaseConfig::add_branch`].
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<BranchPatch> {
        let outcome = self.add_branch(patch.branch.as_deref())?;
        if patch.remove_git_provider {
            let removed = self.remove_git_provider_plugins();
            tracing::info!(removed, "Removed git provider plugins from {RELEASERC_FILE}");
        }
        Ok(outcome)
    }

    /// Serialize the document back to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.root).map_err(Error::Serialize)
    }
}

fn branch_name(branch: &Value) -> Option<&str> {
    match branch {
        Value::String(name) => Some(name),
        Value::Object(fields) => fields.get("name").and_then(Value::as_str),
        _ => None,
    }
}

fn plugin_name(plugin: &Value) -> Option<&str> {
    match plugin {
        Value::String(name) => Some(name),
        Value::Array(pair) => pair.first().and_then(Value::as_str),
        _ => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
