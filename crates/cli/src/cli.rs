use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "semrel")]
#[command(about = "Run semantic-release in a container with a temporarily patched configuration")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        env = "SEMREL_LOG_FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show version information")]
    Version,
    #[command(about = "Run semantic-release against a source directory")]
    Release(ReleaseArgs),
}

#[derive(Args, Clone)]
pub struct ReleaseArgs {
    #[arg(long, help = "Directory containing the project to release", default_value = ".")]
    pub dir: PathBuf,

    #[arg(
        long,
        env = "SEMREL_PROVIDER",
        default_value = "github",
        help = "Git provider; 'github' passes the token as GH_TOKEN, anything else as GL_TOKEN"
    )]
    pub provider: String,

    #[arg(
        long,
        env = "SEMREL_TOKEN",
        hide_env_values = true,
        help = "Personal access token for the git provider"
    )]
    pub token: String,

    #[arg(long, help = "Release configuration to patch (e.g. .releaserc.json)")]
    pub config: Option<PathBuf>,

    #[arg(long, requires = "config", help = "Branch to add to the configuration for this run")]
    pub branch: Option<String>,

    #[arg(
        long,
        requires = "config",
        help = "Remove @semantic-release/github and @semantic-release/gitlab from plugins"
    )]
    pub remove_git_provider: bool,

    #[arg(long, help = "Let semantic-release check that it runs in CI (omit --no-ci)")]
    pub check_if_ci: bool,

    #[arg(long, help = "Perform a real release instead of a dry run")]
    pub no_dry_run: bool,

    #[arg(long, env = "SEMREL_IMAGE", help = "Override the semantic-release image")]
    pub image: Option<String>,

    #[arg(
        long,
        env = "SEMREL_ENGINE_TIMEOUT_MS",
        help = "Milliseconds to wait for the container engine session to start"
    )]
    pub engine_timeout_ms: Option<u64>,

    #[arg(long, help = "Print the container specification as JSON instead of running it")]
    pub print_spec: bool,
}

impl fmt::Debug for ReleaseArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseArgs")
            .field("dir", &self.dir)
            .field("provider", &self.provider)
            .field("token", &"[REDACTED]")
            .field("config", &self.config)
            .field("branch", &self.branch)
            .field("remove_git_provider", &self.remove_git_provider)
            .field("check_if_ci", &self.check_if_ci)
            .field("no_dry_run", &self.no_dry_run)
            .field("image", &self.image)
            .field("engine_timeout_ms", &self.engine_timeout_ms)
            .field("print_spec", &self.print_spec)
            .finish()
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
