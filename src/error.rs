//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 参数验证错误
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 请求体超出限制
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// 资源不存在
    #[error("{0}")]
    NotFound(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    Database(String),

    /// 连接错误
    #[error("Connection error: {0}")]
    Connection(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 学生记录不存在
    pub fn student_not_found() -> Self {
        AppError::NotFound("Student not found".to_string())
    }

    /// 是否为客户端错误
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::PayloadTooLarge(_) | AppError::NotFound(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(feature = "surrealdb")]
impl From<surrealdb::Error> for AppError {
    fn from(e: surrealdb::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        if self.is_client_error() {
            tracing::debug!(code = %code, "request rejected: {}", self);
        } else {
            tracing::error!(code = %code, "request failed: {}", self);
        }

        let body = Json(ErrorResponse::new(&code, &self.to_string()));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
    /// 请求 ID
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE".to_string()),
            AppError::Connection(_) => (503, "SERVICE_UNAVAILABLE".to_string()),
            AppError::Database(_) => (500, "STORE_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
