//! Configurable semantic-release runs for CI pipelines.
//!
//! semrel prepares everything needed to run
//! [semantic-release](https://semantic-release.gitbook.io/) inside a
//! container:
//!
//! - [`config`] - patch `.releaserc.json` in memory (temporary branches,
//!   stripping git provider plugins)
//! - [`command`] - the `semantic-release` command line
//! - [`provider`] - mapping a git provider to its token variable
//! - [`container`] - immutable container specifications
//! - [`session`] - the two-step configure/release flow
//! - [`runtime`] - the trait engines implement to run a spec
//!
//! # Example
//!
//! ```rust,ignore
//! use semrel_core::{ReleaseOptions, ReleaseSession, SecretHandle};
//!
//! let mut session = ReleaseSession::new();
//! session.with_config(".releaserc.json", Some("feature/login")).await?;
//! let spec = session.release(
//!     ".",
//!     "github",
//!     SecretHandle::new("token", token),
//!     &ReleaseOptions::default(),
//! );
//! let output = runtime.run(&spec).await?;
//! ```

pub mod command;
pub mod config;
pub mod container;
pub mod error;
pub mod provider;
pub mod runtime;
pub mod session;

pub use command::{ReleaseCommand, construct_cmd};
pub use config::{BranchPatch, ConfigPatch, RELEASERC_FILE, ReleaseConfig};
pub use container::{ContainerSpec, ContainerSpecBuilder, FileState, SecretHandle, Step};
pub use error::{Error, Result};
pub use provider::GitProvider;
pub use runtime::{ContainerRuntime, RunOutput};
pub use session::{ReleaseOptions, ReleaseSession, SEMANTIC_RELEASE_IMAGE, SOURCE_MOUNT};
