//! `inkwell` admin CLI.
//!
//! Manages the YAML credential file the server checks sign-ins against.
//! Works directly on the file; the server does not need to be running and
//! picks up changes on the next sign-in attempt.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use inkwell_core::credentials::{CredentialStore, DEFAULT_COST, hash_password};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

// ── CLI structure ────────────────────────────────────────────────────

/// Inkwell: a small Markdown and plain-text CMS.
#[derive(Parser)]
#[command(
    name = "inkwell",
    version,
    about = "Inkwell CLI — manage users and password hashes",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         INKWELL_CREDENTIALS   Credential file (default: users.yml)\n\n\
         {DIM}Examples:{RESET}\n  \
         inkwell user add admin --password secret\n  \
         inkwell user list\n  \
         inkwell hash-password secret --cost 12"
    ),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bcrypt hash of a password.
    HashPassword {
        /// Password to hash.
        password: String,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = DEFAULT_COST)]
        cost: u32,
    },
    /// Manage users in the credential file.
    User {
        /// Path to the credential file.
        #[arg(long, env = "INKWELL_CREDENTIALS", default_value = "users.yml", global = true)]
        credentials: PathBuf,

        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Add a user, or replace an existing user's password with `--force`.
    Add {
        /// Username.
        name: String,
        /// Password (stored as a bcrypt hash).
        #[arg(long, env = "INKWELL_PASSWORD")]
        password: String,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = DEFAULT_COST)]
        cost: u32,
        /// Overwrite the password of an existing user.
        #[arg(long)]
        force: bool,
    },
    /// Remove a user.
    Remove {
        /// Username.
        name: String,
    },
    /// List usernames.
    List,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(title: &str) {
    println!("{BOLD}{CYAN}{title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

// ── Entry point ──────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{RED}{BOLD}✗ Error:{RESET} {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::HashPassword { password, cost } => cmd_hash_password(&password, cost),
        Commands::User {
            credentials,
            action,
        } => cmd_user(&CredentialStore::new(credentials), action).await,
    }
}

fn cmd_hash_password(password: &str, cost: u32) -> Result<()> {
    let hash = hash_password(password, cost).context("failed to hash password")?;
    // Bare output so it can be piped or pasted into the YAML file.
    println!("{hash}");
    Ok(())
}

async fn cmd_user(store: &CredentialStore, action: UserCommands) -> Result<()> {
    let path = store.path().display().to_string();

    match action {
        UserCommands::Add {
            name,
            password,
            cost,
            force,
        } => {
            let name = name.trim().to_owned();
            if name.is_empty() {
                bail!("username must not be empty");
            }
            if password.is_empty() {
                bail!("password must not be empty");
            }

            let mut credentials = store.load_or_default().await?;
            if credentials.contains_key(&name) && !force {
                bail!("user '{name}' already exists in {path} (use --force to replace)");
            }

            let hash = hash_password(&password, cost).context("failed to hash password")?;
            let replaced = credentials.insert(name.clone(), hash).is_some();
            store.save(&credentials).await?;

            if replaced {
                success(&format!("Password updated for '{name}' in {path}"));
            } else {
                success(&format!("User '{name}' added to {path}"));
            }
        }
        UserCommands::Remove { name } => {
            let mut credentials = store
                .load()
                .await
                .with_context(|| format!("cannot remove '{name}'"))?;
            if credentials.remove(&name).is_none() {
                bail!("user '{name}' not found in {path}");
            }
            store.save(&credentials).await?;
            success(&format!("User '{name}' removed from {path}"));
        }
        UserCommands::List => {
            let credentials = store.load_or_default().await?;
            header(&format!("Users ({path})"));
            if credentials.is_empty() {
                println!("  {DIM}(no users){RESET}");
            }
            for name in credentials.keys() {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
