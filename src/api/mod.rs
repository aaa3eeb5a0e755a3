//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use axum::{Router, extract::DefaultBodyLimit, http::{HeaderValue, Method}, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::app_state::AppState;
use crate::config::config::{AppConfig, CorsConfig};
use crate::error::{AppError, Result};
use crate::observability::create_observability_router;

pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let api = Router::new().merge(routes::student_routes::create_student_router());

    Ok(Router::new()
        .route("/", get(handlers::root))
        .merge(create_observability_router())
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(config.server.max_request_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors)?)
        .with_state(app_state))
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origin = if config.allowed_origins.is_empty()
        || config.allowed_origins.iter().any(|o| o == "*")
    {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| AppError::Config(format!("invalid CORS origin: {}", o)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE]))
}
