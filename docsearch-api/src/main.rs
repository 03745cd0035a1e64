use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{
    fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use app_state::AppState;

mod app_state;
mod config;
mod domain;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./docsearch-api/.env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("docsearch_api=debug,tower_http=debug,info")
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;
    let app_state = AppState::from_settings(&settings).context("Failed to build app state")?;
    let app = router::create(app_state, &settings);

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
