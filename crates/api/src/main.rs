use std::env;

use agro_api::build_app;
use agro_observability::init_tracing;
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("agro_api");

    let bind = env::var("AGRO_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app().await?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "agrobot api started");

    axum::serve(listener, app).await?;
    Ok(())
}
