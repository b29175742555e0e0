// Taskboard API server - single GraphQL endpoint over the document store

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use taskboard::{
    app_state::AppState, config::Config, data_seeder::seed_demo_data, server::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config.clone()).await?;

    if std::env::var("SEED_DEMO_DATA").map(|v| v == "1").unwrap_or(false) {
        if let Err(e) = seed_demo_data(&app_state.store).await {
            tracing::warn!("Demo data seeding failed: {}", e);
        }
    }

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address().parse()?;
    println!("🚀 Taskboard API starting on http://{}", addr);
    println!("  POST /graphql  - queries and mutations");
    println!("  GET  /health   - liveness and store connectivity");
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
