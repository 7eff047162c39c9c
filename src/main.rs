//! Command line front end for `gerrit_tools`.
//!
//! Connection settings come from flags or `GERRIT_*` environment variables;
//! anything still missing is prompted for on stdin.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use gerrit_tools::{GerritClient, GerritConfig};

#[derive(Debug, Parser)]
#[command(name = "gerrit-tools", version, about = "Query project owners and groups on a Gerrit server")]
struct Cli {
    /// Root URL of the Gerrit server, e.g. https://review.example.com/
    #[arg(short, long, env = "GERRIT_URL", global = true)]
    url: Option<String>,

    /// Account name used for HTTP authentication
    #[arg(long, env = "GERRIT_USER", global = true)]
    user: Option<String>,

    /// HTTP password of the account
    #[arg(long, env = "GERRIT_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Per-request timeout in seconds; requests never time out when unset
    #[arg(long, env = "GERRIT_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the owner groups of every refspec of a project
    Owners {
        /// Project name, e.g. webos-pro/audiod
        project: String,
    },
    /// Show a group
    Group {
        group: String,
        /// Endpoint suffix appended to the group URL, e.g. /detail
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// List the members of a group
    Members {
        group: String,
        /// Expand members of included groups
        #[arg(long)]
        recursive: bool,
    },
    /// Add one or more accounts to a group
    AddMember {
        group: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let url = value_or_prompt(cli.url, "Gerrit Url")?;
    let user = value_or_prompt(cli.user, "User account")?;
    let password = value_or_prompt(cli.password, "User Password")?;

    let mut config = GerritConfig::new(&url, user, password)?;
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = GerritClient::connect(config)
        .with_context(|| format!("failed to connect to {url}"))?;
    client.log_info();

    let output = match cli.command {
        Command::Owners { project } => serde_json::to_value(client.get_project_owners(&project)?)?,
        Command::Group { group, suffix } => client.get_group_info(&group, &suffix)?,
        Command::Members { group, recursive } => {
            let suffix = if recursive { "?recursive" } else { "" };
            client.get_members_from_group(&group, suffix)?
        }
        Command::AddMember { group, members } => {
            let members = if members.len() == 1 {
                Value::String(members[0].clone())
            } else {
                Value::from(members)
            };
            client.add_member_to_group(&group, members)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Use `value` if given, otherwise ask for it on stdin.
fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        bail!("{label} is required");
    }
    Ok(line)
}
