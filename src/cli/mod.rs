//! CLI argument parsing for op.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Run services and stacks of services for local development.
///
/// Configuration lives in `~/.op/config.yml`, seeded with defaults on first
/// use. A `config.yml` in the current directory overrides it.
#[derive(Parser, Debug)]
#[command(name = "op")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (once for debug, twice for trace).
    #[arg(long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a service or every service in a stack.
    Run(TargetCommand),

    /// Stop a service or every service in a stack.
    Stop(TargetCommand),

    /// List configured services or stacks.
    List {
        #[command(subcommand)]
        kind: ListKind,
    },

    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct TargetCommand {
    #[command(subcommand)]
    pub target: Target,
}

#[derive(Subcommand, Debug)]
pub enum Target {
    /// A single service.
    Service(ServiceArgs),

    /// A stack; members always run in the background.
    Stack(StackArgs),
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service key, e.g. `mysql`.
    pub name: String,

    /// Image version to use instead of the configured one.
    #[arg(short = 'v', long = "version")]
    pub version: Option<String>,

    /// Run in the background regardless of the configured `AsDaemon`.
    #[arg(short, long)]
    pub daemon: bool,
}

#[derive(Args, Debug)]
pub struct StackArgs {
    /// Stack key, e.g. `observability`.
    pub name: String,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Services,
    Stacks,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the workspace config file path.
    Path,

    /// Print the effective configuration as YAML.
    Show {
        /// Only show the resolved members of this stack.
        #[arg(long)]
        stack: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
