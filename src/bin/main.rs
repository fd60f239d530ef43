use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use schedule_service::DatabaseConfig;

#[derive(Parser)]
#[command(name = "schedule-service")]
#[command(about = "Conference schedule REST service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the schedule REST server
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
        #[arg(long, default_value = "memory", env = "SCHEDULE_DB_URL")]
        db_url: String,
        /// Fixed pause in milliseconds applied to GET /all before responding
        #[arg(long, default_value = "102", env = "SCHEDULE_ALL_DELAY_MS")]
        all_delay_ms: u64,
    },
    /// Initialize the database schema
    Init {
        #[arg(long, default_value = "memory", env = "SCHEDULE_DB_URL")]
        db_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("schedule_service=info".parse()?)
                .add_directive("tower_http=warn".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            db_url,
            all_delay_ms,
        } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for REST server: {}", db_config.url);

            let app =
                schedule_service::create_app(db_config, Duration::from_millis(all_delay_ms))
                    .await?;

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
            info!("Schedule server listening on http://0.0.0.0:{}", port);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing database...");
            let db = schedule_service::create_connection(db_config).await?;
            schedule_service::ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
    }

    Ok(())
}
