/*!
 * huntdb admin tool
 *
 * Runs the facade operations against the store configured in the
 * environment (same variables as the server) and prints JSON results.
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use huntdb::{config::Config, facade::DbUtil, models::NewUser};

#[derive(Parser, Debug)]
#[command(name = "huntdb-admin", about = "Inspect and edit stamp hunt users")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print user and stamp totals
    Stats,
    /// List every stored user
    Users,
    /// Show one user, or null if none exists
    User { email: String },
    /// Create or merge a user.
    ///
    /// Every profile field is written: options left out are stored as null
    /// and the stamp list is replaced by the `--stamp` values (empty when
    /// none are given). Use `stamps` to change stamps alone.
    Save {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        programme: Option<String>,
        #[arg(long)]
        grad_year: Option<i64>,
        /// Stamp to store; repeat for several
        #[arg(long = "stamp")]
        stamps: Vec<String>,
    },
    /// Replace a user's stamps
    Stamps {
        email: String,
        stamps: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db = DbUtil::from_config(&config).context("Failed to open document store")?;

    match cli.command {
        Command::Stats => print_json(&db.get_stats().await?),
        Command::Users => print_json(&db.get_all_users().await?),
        Command::User { email } => print_json(&db.get_user(&email).await?),
        Command::Save {
            email,
            name,
            role,
            programme,
            grad_year,
            stamps,
        } => {
            let user = NewUser {
                name,
                role,
                programme,
                grad_year,
                stamps: Some(stamps),
                ..NewUser::new(email)
            };
            print_json(&db.save_user(user).await?)
        }
        Command::Stamps { email, stamps } => print_json(&db.update_stamps(&email, stamps).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_accepts_repeated_stamps() {
        let cli = Cli::try_parse_from([
            "huntdb-admin",
            "save",
            "a@polyu.edu.hk",
            "--name",
            "Ada",
            "--stamp",
            "library",
            "--stamp",
            "atrium",
        ])
        .unwrap();

        match cli.command {
            Command::Save { email, name, stamps, .. } => {
                assert_eq!(email, "a@polyu.edu.hk");
                assert_eq!(name.as_deref(), Some("Ada"));
                assert_eq!(stamps, vec!["library", "atrium"]);
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn test_save_without_stamps_writes_empty_list() {
        let cli = Cli::try_parse_from(["huntdb-admin", "save", "a@polyu.edu.hk"]).unwrap();
        match cli.command {
            Command::Save { stamps, .. } => assert!(stamps.is_empty()),
            other => panic!("expected save, got {:?}", other),
        }
    }
}
