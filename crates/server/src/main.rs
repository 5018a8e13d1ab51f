use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use content_store::{ContentStoreClient, OrderStore};
use shared::protocol::{DeleteOrderFailure, DeleteOrderRequest, DeleteOrderResponse};
use tracing::{error, info};

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    store: Arc<dyn OrderStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let store = ContentStoreClient::new(settings.store_config());
    let state = AppState {
        store: Arc::new(store),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "order delete service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/orders", delete(delete_order))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Passthrough to the store's delete operation. No idempotency key and no
/// authorization check at this boundary; the store token is the only gate.
async fn delete_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteOrderRequest>,
) -> Result<Json<DeleteOrderResponse>, (StatusCode, Json<DeleteOrderFailure>)> {
    let order_id = req
        .order_id
        .filter(|id| !id.as_str().trim().is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(DeleteOrderFailure {
                    message: "Order ID is required".into(),
                    error: None,
                }),
            )
        })?;

    match state.store.delete_order(&order_id).await {
        Ok(result) => Ok(Json(DeleteOrderResponse {
            message: "Order deleted successfully".into(),
            result,
        })),
        Err(err) => {
            error!(order_id = %order_id, error = %err, "store rejected order delete");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteOrderFailure {
                    message: "Failed to delete order".into(),
                    error: Some(err.to_string()),
                }),
            ))
        }
    }
}
