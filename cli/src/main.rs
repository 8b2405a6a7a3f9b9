use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod utils;

use commands::apply::{self, Request, Scope};
use commands::{check, show};
use utils::settings;

/// aclctl - Preview access control propagation against a repository fixture
#[derive(Parser)]
#[command(name = "aclctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Access control settings file (defaults to config.authz[.<env>].yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the access control lists of a fixture
    Show {
        #[command(flatten)]
        fixture: FixtureArgs,

        /// Only show ACLs at or below this node
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Grant privileges to a principal
    Grant {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        change: ChangeArgs,
    },

    /// Revoke privileges from a principal
    Revoke {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        change: ChangeArgs,
    },

    /// Remove every access control policy in scope
    Clear {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Check that every ACL can still be amended
    Check {
        #[command(flatten)]
        fixture: FixtureArgs,
    },
}

#[derive(Args)]
struct FixtureArgs {
    /// Repository fixture (YAML)
    #[arg(long, env = "AUTHZ_FIXTURE")]
    fixture: PathBuf,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text")]
    format: String,
}

#[derive(Args)]
struct TargetArgs {
    #[command(flatten)]
    fixture: FixtureArgs,

    /// Node the operation starts from
    #[arg(short, long)]
    path: String,

    /// Also apply to every node up to and including this ancestor
    #[arg(long, conflicts_with = "recursive")]
    to: Option<String>,

    /// Also apply to descendants of the type given by --node-type
    #[arg(short, long, requires = "node_type")]
    recursive: bool,

    /// Node type descended into by --recursive
    #[arg(long, requires = "recursive")]
    node_type: Option<String>,
}

#[derive(Args)]
struct ChangeArgs {
    /// Principal name
    #[arg(long)]
    principal: String,

    /// Privilege name (repeatable)
    #[arg(long = "privilege", required = true, num_args = 1..)]
    privileges: Vec<String>,
}

impl TargetArgs {
    fn into_request(self) -> Request {
        let scope = match (self.to, self.node_type) {
            (Some(target), _) => Scope::Ancestors { target },
            (None, Some(node_type)) if self.recursive => Scope::Tree { node_type },
            _ => Scope::Node,
        };

        Request {
            fixture: self.fixture.fixture,
            path: self.path,
            scope,
            format: self.fixture.format,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let settings = settings::load(cli.config.as_deref())?;

    // Execute the command
    match cli.command {
        Commands::Show { fixture, path } => {
            show::execute(&fixture.fixture, path.as_deref(), &fixture.format)?;
        }
        Commands::Grant { target, change } => {
            apply::grant(
                &target.into_request(),
                &change.principal,
                &change.privileges,
                settings,
            )?;
        }
        Commands::Revoke { target, change } => {
            apply::revoke(
                &target.into_request(),
                &change.principal,
                &change.privileges,
                settings,
            )?;
        }
        Commands::Clear { target } => {
            apply::clear(&target.into_request(), settings)?;
        }
        Commands::Check { fixture } => {
            check::execute(&fixture.fixture, &fixture.format, &settings)?;
        }
    }

    Ok(())
}
