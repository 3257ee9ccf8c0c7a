//! Teacher report service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teacher_report::{
    config::Args,
    db::{MongoClient, MongoReportStore},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("teacher_report={},info", args.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let listen = args.listen_addr();
    info!("Teacher report v{}", env!("CARGO_PKG_VERSION"));
    info!("Listen: {}", listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    if args.dev_mode {
        warn!("Development mode enabled - do not expose this instance");
    }

    let mongo_uri = args.mongo_uri.clone().unwrap_or_default();
    let mongo = match MongoClient::new(&mongo_uri, args.mongodb_db.as_deref()).await {
        Ok(client) => {
            info!("MongoDB connected (database: {})", client.db_name());
            client
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(MongoReportStore::new(&mongo));
    let state = match AppState::from_args(&args, store) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(state, listen).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
