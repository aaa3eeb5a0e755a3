//! 实体映射
//!
//! 将存储中的原始文档转换为对外的响应结构。映射是纯函数，不产生副作用。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::student::fields;
use crate::storage::document::{Document, StoredDocument};

/// 持久化形式的学生记录
pub type StoredStudent = StoredDocument;

/// 对外地址表示；历史文档可能缺少字段，缺少时为 `null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// 对外完整学生记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub address: AddressResponse,
}

/// 列表中的精简投影
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub name: String,
    pub age: i64,
}

/// 转换为完整的对外记录
pub fn to_wire_form(stored: &StoredStudent) -> Result<StudentResponse> {
    let address = stored.body.get(fields::ADDRESS).and_then(Value::as_object);

    Ok(StudentResponse {
        id: stored.id.clone(),
        name: required_name(stored)?,
        age: required_age(stored)?,
        address: AddressResponse {
            city: optional_str(address, fields::CITY),
            country: optional_str(address, fields::COUNTRY),
        },
    })
}

/// 转换为 `{name, age}` 投影
pub fn to_summary(stored: &StoredStudent) -> Result<StudentSummary> {
    Ok(StudentSummary {
        name: required_name(stored)?,
        age: required_age(stored)?,
    })
}

fn required_name(stored: &StoredStudent) -> Result<String> {
    stored
        .body
        .get(fields::NAME)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| corrupt(stored, fields::NAME))
}

fn required_age(stored: &StoredStudent) -> Result<i64> {
    stored
        .body
        .get(fields::AGE)
        .and_then(Value::as_i64)
        .ok_or_else(|| corrupt(stored, fields::AGE))
}

fn optional_str(map: Option<&Document>, key: &str) -> Option<String> {
    map?.get(key)?.as_str().map(str::to_owned)
}

fn corrupt(stored: &StoredStudent, field: &str) -> AppError {
    AppError::Database(format!(
        "stored student {} has no valid '{}' field",
        stored.id, field
    ))
}
