//! New Jyoti Sweets CLI - catalog and chat host tools.
//!
//! # Usage
//!
//! ```bash
//! # List the whole menu
//! jyoti-cli menu
//!
//! # Filter by category and search text
//! jyoti-cli menu --category ghee --search kaju
//!
//! # List category slugs
//! jyoti-cli categories
//!
//! # Ask the chat host a question (uses GEMINI_API_KEY when set)
//! jyoti-cli ask "Which sweets are made in pure ghee?"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jyoti-cli")]
#[command(author, version, about = "New Jyoti Sweets CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List menu items
    Menu {
        /// Category slug (`all`, `ghee`, `namkeen`, ...)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Case-insensitive search over names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List category slugs and labels
    Categories,
    /// Send one message to the chat host and print the reply
    Ask {
        /// Message for the host
        message: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jyoti_cli=info,jyoti_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Menu { category, search } => commands::menu::list(&category, &search)?,
        Commands::Categories => commands::menu::categories(),
        Commands::Ask { message } => commands::ask::ask(&message).await?,
    }
    Ok(())
}
