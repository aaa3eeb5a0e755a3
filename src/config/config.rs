use serde::{Deserialize, Serialize};

/// 存储后端类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 进程内存储，进程退出即丢失
    #[default]
    Memory,
    /// SurrealDB 文档数据库
    SurrealDb,
}

/// 部分更新的持久化策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchPolicy {
    /// 只在存储层原地设置提交的叶子字段
    #[default]
    Set,
    /// 读取记录、内存中合并后整体替换文档
    ///
    /// 读改写之间没有并发保护，两个重叠的 PATCH 可能丢失其中一个的修改。
    Replace,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SurrealDB 连接地址
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
    /// 学生记录所在的表
    pub table: String,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// 存储后端
    pub backend: StorageBackend,
    /// PATCH 持久化策略
    pub patch_policy: PatchPolicy,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源，`*` 表示任意来源
    pub allowed_origins: Vec<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 跨域配置
    pub cors: CorsConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "ws://localhost:8000".into(),
                namespace: "rollcall".into(),
                database: "registry".into(),
                username: "root".into(),
                password: "root".into(),
                table: "student".into(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                patch_policy: PatchPolicy::Set,
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                max_request_size: 1024 * 1024,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".into()],
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
            },
            app_name: "rollcall".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.storage.backend = StorageBackend::SurrealDb;
        config.logging.level = "info".into();
        config.logging.structured = true;
        config
    }
}
