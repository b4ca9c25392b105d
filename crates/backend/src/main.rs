use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::middleware;
use backend::api::{self, AppState};
use backend::shared::config::load_config;
use backend::shared::data_source::{DataStore, SalesApiClient};
use backend::system;
use backend::system::access::extractor::ROLE_HEADER;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;
    tracing::info!(
        "Data source: {} (page size {}, {} retries)",
        config.api.base_url,
        config.api.page_size,
        config.api.retries
    );

    let client = SalesApiClient::new(&config.api)
        .map_err(|e| anyhow::anyhow!("http client init failed: {e}"))?;
    let store = DataStore::new(Arc::new(client), &config.cache);
    let state = Arc::new(AppState::new(store));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ROLE_HEADER),
        ]);

    let app = api::router(state)
        .layer(cors)
        .layer(middleware::from_fn(system::middleware::request_logger));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
