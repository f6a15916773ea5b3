use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{api, config, error::AppError, types::PkceToken};

/// Serves the OAuth callback and a health check on `SERVER_ADDRESS` until the
/// process exits.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Result<(), AppError> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| AppError::Config(format!("invalid SERVER_ADDRESS: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
