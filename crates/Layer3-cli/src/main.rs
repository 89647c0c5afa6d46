//! Nging permission CLI - Main entry point

mod commands;
mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workspace::Workspace;

/// nging-perm - inspect Nging role permissions from the terminal
#[derive(Parser, Debug)]
#[command(name = "nging-perm")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding nging.json (skips global/project discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check page paths for a user
    Check {
        #[arg(short, long)]
        user: String,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Check command IDs for a user
    CheckCmd {
        #[arg(short, long)]
        user: String,
        #[arg(required = true)]
        cmds: Vec<String>,
    },
    /// Show a user's combined behavior value
    Behavior {
        #[arg(short, long)]
        user: String,
        name: String,
    },
    /// Print the navigation menu, filtered by a user's permission if given
    Menu {
        #[arg(short, long)]
        user: Option<String>,
        /// Only this navigation source
        #[arg(short, long)]
        source: Option<String>,
        /// Include items hidden from the menu
        #[arg(long)]
        all: bool,
    },
    /// List every full path in the navigation tree
    Paths {
        /// Only this navigation source or project ident
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Normalize page permission values for storage
    Build {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Turn submitted form fields into a stored permission string
    Generate {
        /// page, command or behavior
        #[arg(short, long)]
        kind: String,
        /// Form field as name=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },
    /// Find the project owning a URL path
    Project { url: String },
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            let (message, code) = describe_failure(&e);
            eprintln!("{}", message);
            ExitCode::from(code)
        }
    }
}

/// 사용자가 고칠 수 있는 입력 오류(알 수 없는 사용자, 잘못된 종류)는 원인만 짧게 보여주고
/// 종료 코드 2, 설정/파일 오류는 전체 원인 체인과 함께 종료 코드 3
fn describe_failure(e: &anyhow::Error) -> (String, u8) {
    let user_error = e
        .chain()
        .filter_map(|cause| cause.downcast_ref::<nging_foundation::Error>())
        .find(|cause| cause.is_user_facing());
    match user_error {
        Some(cause) => (format!("nging-perm: {}", cause), 2),
        None => (format!("Error: {:#}", e), 3),
    }
}

fn run() -> anyhow::Result<bool> {
    let args = Args::parse();

    if let Command::Build { values } = &args.command {
        commands::build(values);
        return Ok(true);
    }

    let (config, base_dir) = Workspace::config(args.config.as_deref())?;

    // Initialize logging
    let log_level = if args.debug { "debug" } else { config.log_level() };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let workspace = Workspace::load(&config, &base_dir)?;

    let ok = match args.command {
        Command::Check { user, paths } => commands::check(&workspace, &user, &paths)?,
        Command::CheckCmd { user, cmds } => commands::check_cmd(&workspace, &user, &cmds)?,
        Command::Behavior { user, name } => commands::behavior(&workspace, &user, &name)?,
        Command::Menu { user, source, all } => {
            commands::menu(&workspace, user.as_deref(), source.as_deref(), all)?;
            true
        }
        Command::Paths { source } => {
            commands::paths(&workspace, source.as_deref());
            true
        }
        Command::Generate { kind, fields } => {
            commands::generate(&workspace, &kind, &fields)?;
            true
        }
        Command::Project { url } => commands::project(&workspace, &url),
        Command::Build { .. } => true,
    };
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_unknown_user_is_short_message() {
        let err = Err::<(), _>(nging_foundation::Error::NotFound("user mallory".into()))
            .context("Failed to load roles for mallory")
            .unwrap_err();
        let (message, code) = describe_failure(&err);
        assert_eq!(code, 2);
        assert_eq!(message, "nging-perm: Not found: user mallory");
    }

    #[test]
    fn test_broken_file_keeps_full_chain() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Err::<(), _>(nging_foundation::Error::from(parse))
            .context("Failed to load navigation from navigate.json")
            .unwrap_err();
        let (message, code) = describe_failure(&err);
        assert_eq!(code, 3);
        assert!(message.starts_with("Error: Failed to load navigation from navigate.json: JSON error"));
    }
}
