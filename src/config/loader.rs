use crate::config::config::{AppConfig, StorageBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀，嵌套键以 `__` 分隔，例如 `ROLLCALL_SERVER__PORT`
pub const ENV_PREFIX: &str = "ROLLCALL_";

/// 已编译的 SurrealDB 连接协议（`protocol-ws` + `rustls`）
pub const SUPPORTED_DATABASE_SCHEMES: &[&str] = &["ws", "wss"];

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. 环境变量
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.storage.backend == StorageBackend::SurrealDb {
            if config.database.url.is_empty() {
                return Err(ConfigValidationError::MissingDatabaseUrl);
            }
            match config.database.url.split_once("://") {
                Some((scheme, _)) if SUPPORTED_DATABASE_SCHEMES.contains(&scheme) => {}
                _ => {
                    return Err(ConfigValidationError::UnsupportedDatabaseUrl(
                        config.database.url.clone(),
                    ));
                }
            }
            if config.database.table.is_empty() {
                return Err(ConfigValidationError::MissingTable);
            }
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("server port must be greater than 0")]
    InvalidPort,

    #[error("database url is not configured")]
    MissingDatabaseUrl,

    #[error("unsupported database url (expected ws:// or wss://): {0}")]
    UnsupportedDatabaseUrl(String),

    #[error("database table is not configured")]
    MissingTable,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
