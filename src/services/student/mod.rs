//! 学生服务
//!
//! 提供学生记录的创建、列表、查询、部分更新和删除。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::config::PatchPolicy;
use crate::error::{AppError, Result};
use crate::models::mapper::{StudentResponse, StudentSummary, to_summary, to_wire_form};
use crate::models::student::{Student, StudentPatch, fields};
use crate::storage::document::{DocumentStore, Filter, Update};

/// 学生列表过滤条件，未设置的条件不生效，同时设置时为 AND 关系
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StudentFilter {
    /// 国家，精确匹配 `address.country`
    pub country: Option<String>,
    /// 最小年龄（包含）
    pub age_gte: Option<i64>,
}

impl StudentFilter {
    /// 转换为存储层过滤器
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(country) = &self.country {
            filter = filter.eq(fields::ADDRESS_COUNTRY, country.as_str());
        }
        if let Some(age) = self.age_gte {
            filter = filter.gte(fields::AGE, age);
        }
        filter
    }
}

/// 学生服务 trait
#[async_trait]
pub trait StudentService: Send + Sync {
    /// 创建学生，返回存储分配的 ID
    async fn create(&self, student: Student) -> Result<String>;

    /// 按条件列出学生（仅姓名和年龄）
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentSummary>>;

    /// 根据 ID 获取学生
    async fn get(&self, id: &str) -> Result<StudentResponse>;

    /// 部分更新学生
    async fn patch(&self, id: &str, patch: &StudentPatch) -> Result<()>;

    /// 删除学生
    async fn delete(&self, id: &str) -> Result<()>;
}

/// 学生服务实现
pub struct StudentServiceImpl {
    store: Arc<dyn DocumentStore>,
    patch_policy: PatchPolicy,
}

impl StudentServiceImpl {
    /// 创建新的服务实例
    pub fn new(store: Arc<dyn DocumentStore>, patch_policy: PatchPolicy) -> Self {
        Self {
            store,
            patch_policy,
        }
    }
}

#[async_trait]
impl StudentService for StudentServiceImpl {
    async fn create(&self, student: Student) -> Result<String> {
        let id = self.store.insert(student.into_document()).await?;
        info!("Created student {}", id);
        Ok(id)
    }

    async fn list(&self, filter: &StudentFilter) -> Result<Vec<StudentSummary>> {
        let rows = self.store.find_many(&filter.to_filter()).await?;
        debug!("Listed {} students with {:?}", rows.len(), filter);
        rows.iter().map(to_summary).collect()
    }

    async fn get(&self, id: &str) -> Result<StudentResponse> {
        let stored = self
            .store
            .find_one(id)
            .await?
            .ok_or_else(AppError::student_not_found)?;
        to_wire_form(&stored)
    }

    async fn patch(&self, id: &str, patch: &StudentPatch) -> Result<()> {
        let stored = self
            .store
            .find_one(id)
            .await?
            .ok_or_else(AppError::student_not_found)?;

        if patch.is_empty() {
            debug!("Empty patch for student {}, nothing to write", id);
            return Ok(());
        }

        let update = match self.patch_policy {
            PatchPolicy::Set => Update::Set(patch.assignments()),
            PatchPolicy::Replace => {
                let mut body = stored.body;
                patch.apply_to(&mut body);
                Update::Replace(body)
            }
        };

        let matched = self.store.update_one(id, update).await?;
        if matched == 0 {
            // 读取之后、写入之前被删除
            warn!("Student {} disappeared before the patch was written", id);
            return Err(AppError::student_not_found());
        }

        info!("Patched student {} ({:?})", id, self.patch_policy);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let deleted = self.store.delete_one(id).await?;
        if deleted == 0 {
            return Err(AppError::student_not_found());
        }
        info!("Deleted student {}", id);
        Ok(())
    }
}

/// 创建学生服务
pub fn create_student_service(
    store: Arc<dyn DocumentStore>,
    patch_policy: PatchPolicy,
) -> Box<dyn StudentService> {
    Box::new(StudentServiceImpl::new(store, patch_policy))
}
