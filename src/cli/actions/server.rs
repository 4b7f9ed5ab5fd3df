use crate::{api, cli::telemetry, store::Store};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub max_connections: u32,
    pub cors_origin: Option<String>,
}

/// Open the database, bring its schema up to date and serve the API.
/// # Errors
/// Returns an error if the database can't be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let store = Store::connect(&args.dsn, args.max_connections)
        .await
        .context("Failed to connect to database")?;

    store
        .apply_schema()
        .await
        .context("Failed to apply database schema")?;

    info!("Database schema is up to date");

    let result = api::new(args.port, store, args.cors_origin).await;

    telemetry::shutdown_tracer();

    result
}
