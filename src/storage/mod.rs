//! 存储层模块
//!
//! 提供文档持久化服务，支持内存存储和 SurrealDB。

pub mod document;
pub mod factory;
pub mod memory;

#[cfg(feature = "surrealdb")]
pub mod surrealdb;

pub use document::{Condition, Document, DocumentStore, Filter, StoredDocument, Update};
pub use factory::StorageFactory;
pub use memory::MemoryStore;
