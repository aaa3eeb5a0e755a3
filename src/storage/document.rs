//! 文档存储抽象
//!
//! 核心业务只通过 [`DocumentStore`] 访问持久化层，连接管理由具体实现负责。

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::error::Result;

/// 无模式 JSON 文档体（不含标识符）
pub type Document = Map<String, Value>;

/// 带存储标识符的文档
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// 存储分配的唯一标识，创建后不可变
    pub id: String,
    /// 文档体
    pub body: Document,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, body: Document) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// 单个查询条件，路径为点分字段路径，例如 `address.country`
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// 等值匹配
    Eq { path: String, value: Value },
    /// 大于等于
    Gte { path: String, value: Value },
}

impl Condition {
    pub fn path(&self) -> &str {
        match self {
            Condition::Eq { path, .. } | Condition::Gte { path, .. } => path,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Condition::Eq { value, .. } | Condition::Gte { value, .. } => value,
        }
    }

    /// 判断文档是否满足条件；字段缺失时不满足
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = lookup_path(doc, self.path()) else {
            return false;
        };
        match self {
            Condition::Eq { value, .. } => actual == value,
            Condition::Gte { value, .. } => {
                matches!(
                    compare_values(actual, value),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }
        }
    }
}

/// 查询过滤器，所有条件之间为 AND 关系；空过滤器匹配全部文档
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn gte(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Gte {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

/// 文档更新方式
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// 整体替换文档体
    Replace(Document),
    /// 原地设置若干叶子字段，其余字段保持不变
    Set(Vec<(String, Value)>),
}

/// 文档存储 trait
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 插入文档并返回存储分配的标识
    async fn insert(&self, doc: Document) -> Result<String>;

    /// 根据标识获取文档；标识格式非法时返回 `None`
    async fn find_one(&self, id: &str) -> Result<Option<StoredDocument>>;

    /// 按过滤器列出文档，顺序由存储决定
    async fn find_many(&self, filter: &Filter) -> Result<Vec<StoredDocument>>;

    /// 更新文档，返回匹配到的文档数量
    async fn update_one(&self, id: &str, update: Update) -> Result<u64>;

    /// 删除文档，返回删除的文档数量
    async fn delete_one(&self, id: &str) -> Result<u64>;

    /// 检查存储是否可用
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// 按点分路径读取字段
pub fn lookup_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// 按点分路径写入字段，只替换目标叶子
///
/// 中间节点缺失或不是对象时会被替换为空对象。
pub fn set_path(doc: &mut Document, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = doc;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            return;
        };
        current = map;
    }
    current.insert(leaf.to_string(), value);
}

/// 同类型值比较：数字按数值，字符串按字典序，其他类型不可比较
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
