//! tablewright - inspect MySQL tables and sync their structure from design files

mod commands;
mod config;
mod logging;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tablewright_core::Connection;
use tablewright_driver_mysql::MySqlConnection;
use tablewright_table_designer::SnapshotLoader;

use config::Config;

#[derive(Parser)]
#[command(name = "tablewright", version, about = "MySQL table structure designer")]
struct Cli {
    /// Configuration file
    #[arg(long, env = "TABLEWRIGHT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Connection profile from the configuration file
    #[arg(long, short = 'c', global = true)]
    connection: Option<String>,

    /// Password, overriding the profile
    #[arg(long, env = "TABLEWRIGHT_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List databases
    Databases,

    /// List tables
    Tables {
        #[arg(long, short)]
        database: Option<String>,
    },

    /// Show a table's structure
    Show {
        table: String,
        #[arg(long, short)]
        database: Option<String>,
        /// Print as a JSON design file
        #[arg(long)]
        json: bool,
    },

    /// Bring an existing table in line with a design file
    Sync {
        table: String,
        #[arg(long)]
        design: PathBuf,
        #[arg(long, short)]
        database: Option<String>,
        /// Execute the statement instead of only printing it
        #[arg(long)]
        apply: bool,
    },

    /// Create a table from a design file
    Create {
        table: String,
        #[arg(long)]
        design: PathBuf,
        #[arg(long, short)]
        database: Option<String>,
        #[arg(long)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.clone().or_else(config::default_config_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _log_guard = logging::init(&config.logging_config())?;

    let profile = config.connection(cli.connection.as_deref())?;
    let connection = Arc::new(
        MySqlConnection::connect(&profile.connect_options(cli.password.as_deref()))
            .await
            .with_context(|| format!("Failed to connect using profile '{}'", profile.name))?,
    );
    let default_database = connection.default_database().map(str::to_string);
    let loader = SnapshotLoader::new(connection.clone() as Arc<dyn Connection>);
    let strategy = config.designer.alter_strategy;

    let database = |explicit: Option<String>| -> Result<String> {
        match explicit.or_else(|| default_database.clone()) {
            Some(db) => Ok(db),
            None => bail!("No database given; pass --database or set one on the connection profile"),
        }
    };

    let result = match cli.command {
        Command::Databases => commands::list_databases(&loader).await,
        Command::Tables { database: db } => commands::list_tables(&loader, &database(db)?).await,
        Command::Show {
            table,
            database: db,
            json,
        } => commands::show(&loader, &database(db)?, &table, json).await,
        Command::Sync {
            table,
            design,
            database: db,
            apply,
        } => {
            let db = database(db)?;
            commands::sync(connection.as_ref(), &loader, &db, &table, &design, apply, strategy).await
        }
        Command::Create {
            table,
            design,
            database: db,
            apply,
        } => {
            let db = database(db)?;
            commands::create(connection.as_ref(), &loader, &db, &table, &design, apply, strategy)
                .await
        }
    };

    if let Err(err) = connection.close().await {
        tracing::warn!(error = %err, "failed to close connection");
    }
    result
}
