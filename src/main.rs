use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use harusmile::config::AppConfig;
use harusmile::database::{connect_and_migrate, seed_data};
use harusmile::server::{self, MigrateDirection};
use harusmile::services::AuthService;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// TOML configuration file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the GraphQL API
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    User {
        #[clap(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Insert the default genders, addresses and tags
    Seed {
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Delete expired and revoked refresh tokens
    ClearTokens {
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create an active staff account with superuser rights
    CreateSuperuser {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database = database;
            }
            if cors_origin.is_some() {
                config.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.port);
            server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(config.database);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
            DbCommands::Seed { database } => {
                let database = database.unwrap_or(config.database);
                info!("Seeding database: {}", database);
                let db = connect_and_migrate(&database).await?;
                let summary = seed_data::seed_lookup_values(&db).await?;
                info!(
                    "Inserted {} genders, {} addresses and {} tags",
                    summary.genders, summary.addresses, summary.tags
                );
            }
            DbCommands::ClearTokens { database } => {
                let database = database.unwrap_or_else(|| config.database.clone());
                let db = connect_and_migrate(&database).await?;
                AuthService::new(db, &config.auth).clear_stale_tokens().await?;
            }
        },
        Commands::User { command } => match command {
            UserCommands::CreateSuperuser {
                email,
                password,
                database,
            } => {
                let database = database.unwrap_or_else(|| config.database.clone());
                let db = connect_and_migrate(&database).await?;
                AuthService::new(db, &config.auth)
                    .create_superuser(&email, &password)
                    .await?;
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .init();
}
