//! Reis Imports CLI - migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! reis-cli migrate
//!
//! # Provision the administrative identity (idempotent)
//! reis-cli admin create -e admin@reisimports.com.br -p 'S3nh@Forte!' -n "Maycon Reis" --phone 11999999999
//!
//! # Insert demo products for development
//! reis-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "reis-cli")]
#[command(author, version, about = "Reis Imports CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with demo products
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create (or promote) the administrative identity
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Initial password (change after first login)
        #[arg(short, long)]
        password: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Contact phone
        #[arg(long)]
        phone: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                name,
                phone,
            } => {
                commands::admin::create_admin(&email, &password, &name, &phone).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
