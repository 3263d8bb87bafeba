//! Declarative container specifications.
//!
//! A [`ContainerSpec`] describes a container the way a pipeline engine builds
//! one: a base image followed by an ordered list of [`Step`]s. Nothing here
//! executes anything; a [`ContainerRuntime`](crate::runtime::ContainerRuntime)
//! turns the description into a running container.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// A named secret value.
///
/// Debug and Display output show `[REDACTED]`; serialization emits the name
/// only. Two handles are equal when their names are equal, matching how
/// container engines identify secrets.
#[derive(Clone)]
pub struct SecretHandle {
    name: String,
    value: SecretString,
}

impl SecretHandle {
    /// Create a secret from a plaintext value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SecretString::from(value.into()),
        }
    }

    /// The secret's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expose the plaintext for handing to a runtime.
    ///
    /// Never log or persist the returned value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

impl PartialEq for SecretHandle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SecretHandle {}

impl fmt::Debug for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHandle")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for SecretHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// One container construction step, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Set a plain environment variable.
    EnvVariable {
        /// Variable name
        name: String,
        /// Variable value
        value: String,
    },
    /// Expose a secret as an environment variable.
    SecretVariable {
        /// Variable name
        name: String,
        /// The secret to expose
        secret: SecretHandle,
    },
    /// Copy a host directory into the container.
    Directory {
        /// Destination path in the container
        path: String,
        /// Source directory on the host
        source: PathBuf,
    },
    /// Change the working directory.
    Workdir {
        /// New working directory
        path: String,
    },
    /// Remove a file.
    WithoutFile {
        /// File to remove, relative paths resolve against the workdir
        path: String,
    },
    /// Write a new file.
    NewFile {
        /// File to create, relative paths resolve against the workdir
        path: String,
        /// File contents
        contents: String,
    },
    /// Run a command.
    Exec {
        /// Command and arguments
        args: Vec<String>,
    },
}

/// What a spec does to a given file in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState<'a> {
    /// No step touches the file; whatever the mounted tree holds is used.
    Untouched,
    /// The file was removed and not recreated.
    Removed,
    /// The file ends up with these contents.
    Written(&'a str),
}

/// An immutable container description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    image: String,
    steps: Vec<Step>,
}

impl ContainerSpec {
    /// Start building a container from `image`.
    #[must_use]
    pub fn builder(image: impl Into<String>) -> ContainerSpecBuilder {
        ContainerSpecBuilder {
            image: image.into(),
            steps: Vec::new(),
        }
    }

    /// Base image reference.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Value of a plain environment variable, last write wins.
    #[must_use]
    pub fn env(&self, name: &str) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::EnvVariable { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Names of environment variables backed by secrets.
    #[must_use]
    pub fn secret_variables(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::SecretVariable { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Final working directory, if one is set.
    #[must_use]
    pub fn workdir(&self) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::Workdir { path } => Some(path.as_str()),
            _ => None,
        })
    }

    /// Directory copies as `(container path, host source)`.
    #[must_use]
    pub fn directories(&self) -> Vec<(&str, &PathBuf)> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Directory { path, source } => Some((path.as_str(), source)),
                _ => None,
            })
            .collect()
    }

    /// Commands run by the container, in order.
    #[must_use]
    pub fn execs(&self) -> Vec<&[String]> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Exec { args } => Some(args.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Net effect of the file steps on `path`.
    #[must_use]
    pub fn file_state(&self, path: &str) -> FileState<'_> {
        self.steps
            .iter()
            .fold(FileState::Untouched, |state, step| match step {
                Step::WithoutFile { path: p } if p == path => FileState::Removed,
                Step::NewFile { path: p, contents } if p == path => FileState::Written(contents),
                _ => state,
            })
    }
}

/// Builder for [`ContainerSpec`], mirroring a pipeline engine's fluent API.
#[derive(Debug, Clone)]
#[must_use]
pub struct ContainerSpecBuilder {
    image: String,
    steps: Vec<Step>,
}

impl ContainerSpecBuilder {
    /// Set an environment variable.
    pub fn with_env_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.steps.push(Step::EnvVariable {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Expose `secret` as the environment variable `name`.
    pub fn with_secret_variable(mut self, name: impl Into<String>, secret: SecretHandle) -> Self {
        self.steps.push(Step::SecretVariable {
            name: name.into(),
            secret,
        });
        self
    }

    /// Copy the host directory `source` to `path`.
    pub fn with_directory(mut self, path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        self.steps.push(Step::Directory {
            path: path.into(),
            source: source.into(),
        });
        self
    }

    /// Set the working directory.
    pub fn with_workdir(mut self, path: impl Into<String>) -> Self {
        self.steps.push(Step::Workdir { path: path.into() });
        self
    }

    /// Remove a file.
    pub fn without_file(mut self, path: impl Into<String>) -> Self {
        self.steps.push(Step::WithoutFile { path: path.into() });
        self
    }

    /// Write a file with `contents`.
    pub fn with_new_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.steps.push(Step::NewFile {
            path: path.into(),
            contents: contents.into(),
        });
        self
    }

    /// Run a command.
    pub fn with_exec<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(Step::Exec {
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Finish the description.
    pub fn build(self) -> ContainerSpec {
        ContainerSpec {
            image: self.image,
            steps: self.steps,
        }
    }
}
