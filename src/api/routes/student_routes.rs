//! Student Routes
//!
//! 定义学生相关的 API 路由。

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;
use crate::api::handlers::student_handler::*;

/// 创建学生路由器
pub fn create_student_router() -> Router<AppState> {
    Router::new()
        .route("/students", post(create_student).get(list_students))
        .route(
            "/students/:id",
            get(get_student).patch(patch_student).delete(delete_student),
        )
}
