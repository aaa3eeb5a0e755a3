//! 学生 DTO
//!
//! 用于 Student API 的请求和响应序列化

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::mapper::StudentSummary;
use crate::services::student::StudentFilter;

/// 创建学生响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentResponse {
    /// 新学生记录的 ID
    pub id: String,
}

/// 学生列表查询参数
///
/// 以字符串接收，空值视为未提供。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStudentsParams {
    /// 国家筛选
    #[serde(default)]
    pub country: Option<String>,

    /// 最小年龄筛选（包含）
    #[serde(default)]
    pub age: Option<String>,
}

impl TryFrom<ListStudentsParams> for StudentFilter {
    type Error = AppError;

    fn try_from(params: ListStudentsParams) -> Result<Self, Self::Error> {
        let country = params.country.filter(|c| !c.is_empty());
        let age_gte = match params.age.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::Validation(format!("query parameter 'age' must be an integer, got '{}'", raw))
            })?),
        };

        Ok(StudentFilter { country, age_gte })
    }
}

/// 学生列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStudentsResponse {
    /// 学生列表
    pub data: Vec<StudentSummary>,
}

/// 空对象响应 `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// 根路径响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
