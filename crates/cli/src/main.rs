//! Brandgate CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bg-cli migrate
//!
//! # Create an admin account (password read from BRANDGATE_ADMIN_PASSWORD)
//! bg-cli admin create -e admin@example.com -n "Admin Name"
//!
//! # Work with the link queue of a running server
//! bg-cli queue list
//! bg-cli queue add https://example.com/offer -e admin@example.com
//! bg-cli queue consume
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin accounts
//! - `queue` - List, add, remove, clear or consume queued links

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bg-cli")]
#[command(author, version, about = "Brandgate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage the link queue of a running server
    Queue {
        #[command(flatten)]
        server: ServerArgs,

        #[command(subcommand)]
        action: QueueAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long, default_value = "Admin")]
        name: String,

        /// Password (prefer the environment variable)
        #[arg(short, long, env = "BRANDGATE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

/// Where the server is and who to log in as for mutations.
#[derive(Args)]
struct ServerArgs {
    /// Server base URL
    #[arg(long, env = "BRANDGATE_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Admin email (required for add, remove and clear)
    #[arg(short, long, env = "BRANDGATE_ADMIN_EMAIL", global = true)]
    email: Option<String>,

    /// Admin password
    #[arg(long, env = "BRANDGATE_ADMIN_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum QueueAction {
    /// Print the queue in consumption order
    List,
    /// Append a link
    Add {
        /// Absolute http(s) URL
        url: String,
    },
    /// Remove a link by id
    Remove {
        /// Link id (UUID)
        id: String,
    },
    /// Remove every link
    Clear,
    /// Take the head of the queue, as a visitor would
    Consume,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
        },
        Commands::Queue { server, action } => {
            let session = commands::queue::QueueSession::new(
                &server.url,
                server.email.as_deref(),
                server.password.as_deref(),
            )?;
            match action {
                QueueAction::List => session.list().await?,
                QueueAction::Add { url } => session.add(&url).await?,
                QueueAction::Remove { id } => session.remove(&id).await?,
                QueueAction::Clear => session.clear().await?,
                QueueAction::Consume => session.consume().await?,
            }
        }
    }
    Ok(())
}
