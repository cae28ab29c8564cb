//! EC Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! ecshop migrate
//!
//! # Create an administrator
//! ecshop customer create -n "Shop Admin" -e admin@example.com -p 'long-password' --admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ecshop")]
#[command(author, version, about = "EC Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Create a new customer
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (login name)
        #[arg(short, long)]
        email: String,

        /// Password, at least 8 characters
        #[arg(short, long)]
        password: String,

        /// Grant the ADMIN role
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                name,
                email,
                password,
                admin,
            } => commands::customer::create(&name, &email, &password, admin).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_customer_create() {
        let cli = Cli::try_parse_from([
            "ecshop", "customer", "create", "-n", "Ada", "-e", "ada@example.com", "-p",
            "correct-horse", "--admin",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::Customer {
                action: CustomerAction::Create { email, admin, .. },
            } => {
                assert_eq!(email, "ada@example.com");
                assert!(admin);
            }
            Commands::Migrate => panic!("expected customer create"),
        }
    }
}
