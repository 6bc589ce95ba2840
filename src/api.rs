use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clients::health::HealthChecker,
    config::Config,
    error::OperationError,
    models::{health::HealthStatus, request::ReturnEventRequest, response::ApiResponse},
    operation::ReturnStatusOperation,
};

pub struct AppState {
    pub operation: ReturnStatusOperation,
    pub health_checker: HealthChecker,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/notifications/return", post(handle_return_event))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(
    config: Config,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification API server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_return_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReturnEventRequest>,
) -> impl IntoResponse {
    match state.operation.execute(&request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                result,
                "Return-complaint notifications dispatched".to_string(),
            )),
        ),
        Err(e) => {
            let status_code = match &e {
                OperationError::Validation(_) => StatusCode::BAD_REQUEST,
                OperationError::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
                OperationError::Lookup(_) => StatusCode::NOT_FOUND,
                OperationError::ChannelSend { .. } => StatusCode::BAD_GATEWAY,
            };

            (
                status_code,
                Json(ApiResponse::error(
                    e.to_string(),
                    "Return-complaint event rejected".to_string(),
                )),
            )
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
