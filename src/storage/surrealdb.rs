//! SurrealDB 文档存储

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde_json::Value;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use uuid::Uuid;

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::storage::document::{Document, DocumentStore, Filter, StoredDocument, Update, Condition};

/// 查询结果中承载记录标识的字段
const KEY_FIELD: &str = "_key";

/// SurrealDB 存储实现
#[derive(Clone)]
pub struct SurrealStore {
    db: Surreal<Any>,
    table: String,
}

impl SurrealStore {
    /// 建立连接、认证并选择命名空间和数据库
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(&config.url)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| AppError::Connection(e.to_string()))?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        tracing::info!(
            "Connected to SurrealDB at {} ({}/{}), table {}",
            config.url,
            config.namespace,
            config.database,
            config.table
        );

        Ok(Self::new(db, &config.table))
    }

    pub fn new(db: Surreal<Any>, table: &str) -> Self {
        Self {
            db,
            table: table.to_string(),
        }
    }

    fn select_clause() -> String {
        format!("SELECT *, meta::id(id) AS {KEY_FIELD} OMIT id")
    }

    fn into_stored(value: Value) -> Result<StoredDocument> {
        let Value::Object(mut body) = value else {
            return Err(AppError::Database("Unexpected non-object row".to_string()));
        };
        let id = match body.remove(KEY_FIELD) {
            Some(Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => return Err(AppError::Database("Row without record id".to_string())),
        };
        Ok(StoredDocument::new(id, body))
    }
}

/// 字段路径会被拼接进查询语句，只允许字母、数字、下划线和点
fn checked_path(path: &str) -> Result<&str> {
    let valid = !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(path)
    } else {
        Err(AppError::Database(format!("Invalid field path: {}", path)))
    }
}

/// 生成 WHERE 子句及其绑定参数
fn where_clause(filter: &Filter) -> Result<(String, Vec<(String, Value)>)> {
    if filter.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut clauses = Vec::with_capacity(filter.conditions().len());
    let mut bindings = Vec::with_capacity(filter.conditions().len());
    for (i, condition) in filter.conditions().iter().enumerate() {
        let param = format!("f{}", i);
        let path = checked_path(condition.path())?;
        let op = match condition {
            Condition::Eq { .. } => "=",
            Condition::Gte { .. } => ">=",
        };
        clauses.push(format!("{} {} ${}", path, op, param));
        bindings.push((param, condition.value().clone()));
    }

    Ok((format!(" WHERE {}", clauses.join(" AND ")), bindings))
}

/// 生成 SET 子句及其绑定参数
fn set_clause(assignments: Vec<(String, Value)>) -> Result<(String, Vec<(String, Value)>)> {
    let mut clauses = Vec::with_capacity(assignments.len());
    let mut bindings = Vec::with_capacity(assignments.len());
    for (i, (path, value)) in assignments.into_iter().enumerate() {
        let param = format!("v{}", i);
        clauses.push(format!("{} = ${}", checked_path(&path)?, param));
        bindings.push((param, value));
    }
    Ok((clauses.join(", "), bindings))
}

#[async_trait]
impl DocumentStore for SurrealStore {
    async fn insert(&self, doc: Document) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();

        self.db
            .query("CREATE type::thing($table, $id) CONTENT $doc RETURN NONE")
            .bind(("table", self.table.clone()))
            .bind(("id", id.clone()))
            .bind(("doc", Value::Object(doc)))
            .await?
            .check()?;

        tracing::debug!("Created record {}:{}", self.table, id);
        Ok(id)
    }

    async fn find_one(&self, id: &str) -> Result<Option<StoredDocument>> {
        let query = format!("{} FROM type::thing($table, $id)", Self::select_clause());
        let rows: Vec<Value> = self
            .db
            .query(query)
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;

        rows.into_iter().next().map(Self::into_stored).transpose()
    }

    async fn find_many(&self, filter: &Filter) -> Result<Vec<StoredDocument>> {
        let (where_sql, bindings) = where_clause(filter)?;
        let query = format!("{} FROM type::table($table){}", Self::select_clause(), where_sql);

        let mut request = self.db.query(query).bind(("table", self.table.clone()));
        for binding in bindings {
            request = request.bind(binding);
        }
        let rows: Vec<Value> = request.await?.take(0)?;

        rows.into_iter().map(Self::into_stored).collect()
    }

    async fn update_one(&self, id: &str, update: Update) -> Result<u64> {
        let request = match update {
            Update::Replace(body) => self
                .db
                .query("UPDATE type::thing($table, $id) CONTENT $doc RETURN AFTER")
                .bind(("doc", Value::Object(body))),
            Update::Set(assignments) => {
                if assignments.is_empty() {
                    return Ok(self.find_one(id).await?.map_or(0, |_| 1));
                }
                let (set_sql, bindings) = set_clause(assignments)?;
                let mut request = self.db.query(format!(
                    "UPDATE type::thing($table, $id) SET {} RETURN AFTER",
                    set_sql
                ));
                for binding in bindings {
                    request = request.bind(binding);
                }
                request
            }
        };

        let updated: Vec<IgnoredAny> = request
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(updated.len() as u64)
    }

    async fn delete_one(&self, id: &str) -> Result<u64> {
        let removed: Vec<IgnoredAny> = self
            .db
            .query("DELETE type::thing($table, $id) RETURN BEFORE")
            .bind(("table", self.table.clone()))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(removed.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .health()
            .await
            .map_err(|e| AppError::Connection(e.to_string()))
    }
}
