//! accessctl - inspect and exercise an access-control snapshot
//!
//! Loads the engine configuration, optionally applies a definitions file, then runs a
//! single statement as a user and prints the result.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rbac_engine::access::AccessDefinitions;
use rbac_engine::utils::init_logging;
use rbac_engine::{AccessControl, AccessType, Config, GrantScope, SetRole};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "accessctl", version, about = "Role-based access control engine")]
struct Cli {
    /// Engine configuration (YAML); `RBAC_*` variables override it
    #[arg(short, long, env = "ACCESSCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Users, roles and grants to apply before running the command
    #[arg(short, long, env = "ACCESSCTL_DEFINITIONS")]
    definitions: Option<PathBuf>,

    /// Run as this user instead of the bootstrap administrator
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// SHOW ACCESS
    ShowAccess,
    /// SHOW GRANTS [FOR name]
    ShowGrants {
        #[arg(long = "for")]
        name: Option<String>,
    },
    /// Check one privilege; exits non-zero when it is not granted
    Check {
        #[arg(short, long)]
        access: String,
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        table: Option<String>,
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },
    /// Current, enabled and default roles of a fresh session
    Roles {
        /// Roles to activate first (SET ROLE); `NONE` disables all of them
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let env = Config::from_env()?;
    let config = match path {
        Some(path) => Config::from_file(path).await?.merge(env),
        None => env,
    };
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_ref()).await?;
    init_logging(config.logging())?;

    let access = AccessControl::from_config(&config).context("Failed to start access control")?;
    if let Some(path) = &cli.definitions {
        let report = AccessDefinitions::from_file(path).await?.apply(&access)?;
        info!("Applied definitions: {:?}", report);
    }

    let session = match &cli.user {
        Some(user) => access.login(user)?,
        None => access.admin_session()?,
    };

    match cli.command {
        Command::ShowAccess => print_lines(access.show_access(&session)?),
        Command::ShowGrants { name } => print_lines(access.show_grants(&session, name.as_deref())?),
        Command::Check {
            access: privilege,
            database,
            table,
            columns,
        } => {
            let privilege: AccessType = privilege.parse()?;
            let scope = GrantScope::from_parts(database, table, columns)?;
            if !access.has_privilege(&session, privilege, &scope)? {
                println!("denied");
                return Ok(ExitCode::FAILURE);
            }
            println!("granted");
        }
        Command::Roles { set } => {
            if let Some(roles) = set {
                if roles.is_empty() {
                    bail!("--set needs at least one role");
                }
                let keyword = match roles.as_slice() {
                    [single] => single.to_ascii_uppercase(),
                    _ => String::new(),
                };
                let request = match keyword.as_str() {
                    "NONE" => SetRole::None,
                    "DEFAULT" => SetRole::Default,
                    "ALL" => SetRole::All,
                    _ => SetRole::Roles(roles),
                };
                access.set_role(&session, request)?;
            }
            println!("current: {}", access.current_roles_of(&session)?.join(", "));
            println!("enabled: {}", access.enabled_roles_of(&session)?.join(", "));
            println!("default: {}", access.default_roles_of(&session)?.join(", "));
        }
        Command::Config => print!("{}", config.to_yaml()?),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
