//! 可观测性模块
//!
//! 提供结构化日志初始化和健康检查。

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::api::app_state::AppState;
use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};
use crate::storage::factory::StorageFactory;

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub message: Option<String>,
}

/// 健康检查端点，存储不可用时返回 503
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339();
    match StorageFactory::health_check(state.store.as_ref()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy".to_string(),
                version: state.version.clone(),
                timestamp,
                message: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unhealthy".to_string(),
                    version: state.version.clone(),
                    timestamp,
                    message: Some(e.to_string()),
                }),
            )
        }
    }
}

/// 创建可观测性路由
pub fn create_observability_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的日志级别。
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::Config(format!("invalid log level '{}': {}", config.level, e)))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true);

    let installed = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| AppError::Internal(format!("failed to set tracing subscriber: {}", e)))
}
