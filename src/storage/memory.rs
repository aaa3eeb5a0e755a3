//! 内存文档存储
//!
//! 用于开发和测试。保持插入顺序，标识为 UUID v4 的 32 位十六进制形式。

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::document::{
    Document, DocumentStore, Filter, StoredDocument, Update, set_path,
};

#[derive(Debug, Default)]
struct Table {
    next_seq: u64,
    rows: BTreeMap<u64, StoredDocument>,
    index: HashMap<String, u64>,
}

/// 内存存储实现
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前文档数量
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 标识格式非法时直接视为不存在
    fn is_well_formed(id: &str) -> bool {
        Uuid::try_parse(id).is_ok()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, doc: Document) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();

        let mut table = self.table.write();
        let seq = table.next_seq;
        table.next_seq += 1;
        table.index.insert(id.clone(), seq);
        table.rows.insert(seq, StoredDocument::new(id.clone(), doc));

        Ok(id)
    }

    async fn find_one(&self, id: &str) -> Result<Option<StoredDocument>> {
        if !Self::is_well_formed(id) {
            tracing::debug!("Malformed document id: {}", id);
            return Ok(None);
        }

        let table = self.table.read();
        Ok(table
            .index
            .get(id)
            .and_then(|seq| table.rows.get(seq))
            .cloned())
    }

    async fn find_many(&self, filter: &Filter) -> Result<Vec<StoredDocument>> {
        let table = self.table.read();
        Ok(table
            .rows
            .values()
            .filter(|row| filter.matches(&row.body))
            .cloned()
            .collect())
    }

    async fn update_one(&self, id: &str, update: Update) -> Result<u64> {
        let mut table = self.table.write();
        let Some(seq) = table.index.get(id).copied() else {
            return Ok(0);
        };
        let Some(row) = table.rows.get_mut(&seq) else {
            return Ok(0);
        };

        match update {
            Update::Replace(body) => row.body = body,
            Update::Set(assignments) => {
                for (path, value) in assignments {
                    set_path(&mut row.body, &path, value);
                }
            }
        }

        Ok(1)
    }

    async fn delete_one(&self, id: &str) -> Result<u64> {
        let mut table = self.table.write();
        let Some(seq) = table.index.remove(id) else {
            return Ok(0);
        };
        Ok(table.rows.remove(&seq).map_or(0, |_| 1))
    }
}
