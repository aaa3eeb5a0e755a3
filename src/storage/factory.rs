//! 存储工厂模块
//!
//! 根据配置创建相应的文档存储实例。

use std::sync::Arc;

use crate::config::config::{AppConfig, StorageBackend};
use crate::error::{AppError, Result};
use crate::storage::document::DocumentStore;
use crate::storage::memory::MemoryStore;

#[cfg(feature = "surrealdb")]
use crate::storage::surrealdb::SurrealStore;

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储实例
    pub async fn create(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
        match config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, records are lost on shutdown");
                Ok(Arc::new(MemoryStore::new()))
            }
            #[cfg(feature = "surrealdb")]
            StorageBackend::SurrealDb => {
                let store = SurrealStore::connect(&config.database).await?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "surrealdb"))]
            StorageBackend::SurrealDb => Err(AppError::Config(
                "SurrealDB feature is not enabled. Enable 'surrealdb' feature to use SurrealDB."
                    .into(),
            )),
        }
    }

    /// 检查存储是否可用
    pub async fn health_check(store: &dyn DocumentStore) -> Result<()> {
        store.ping().await.map_err(|e| match e {
            AppError::Connection(_) => e,
            other => AppError::Connection(other.to_string()),
        })
    }
}
