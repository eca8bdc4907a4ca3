//! 应用运行配置加载。
//!
//! - 进程级配置：环境变量（`AppConfig::from_env`）
//! - 用户配置：`userconfig.json`（生产日与班次）
//! - 标签集合：`sets.json`（测点 → 目标标签映射）

pub mod sets;
pub mod user_config;
pub mod validation;

pub use sets::{SetItem, TagSet, TagSetFile};
pub use user_config::UserConfig;
pub use validation::{is_valid_identifier, validate_period_settings};

use std::env;
use std::path::PathBuf;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("config file {0}: {1}")]
    Io(String, String),
    #[error("config file {0} is not valid json: {1}")]
    Parse(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 仅 `ping`/`write` 需要，`preview` 不连接数据库。
    pub database_url: Option<String>,
    pub time_zone: String,
    pub config_dir: PathBuf,
    pub table_schema: String,
    pub table_name: String,
    pub read_timeout_ms: u64,
    /// `last-completed` 或 `rule`，由调用方解析。
    pub hour_policy: String,
    pub source_label: String,
    pub readings_file: PathBuf,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = read_optional("HIST_DATABASE_URL");
        let time_zone = env::var("HIST_TIME_ZONE").unwrap_or_else(|_| "Asia/Tashkent".to_string());
        let config_dir = PathBuf::from(
            env::var("HIST_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string()),
        );
        let table_schema = read_identifier_with_default("HIST_TABLE_SCHEMA", "public")?;
        let table_name = read_identifier_with_default("HIST_TABLE_NAME", "tag_data")?;
        let read_timeout_ms = read_u64_with_default("HIST_READ_TIMEOUT_MS", 5000)?;
        let hour_policy =
            env::var("HIST_HOUR_POLICY").unwrap_or_else(|_| "last-completed".to_string());
        let source_label =
            read_optional("HIST_SOURCE_LABEL").unwrap_or_else(|| "hist-writer".to_string());
        let readings_file = PathBuf::from(
            env::var("HIST_READINGS_FILE").unwrap_or_else(|_| "./readings.json".to_string()),
        );

        Ok(Self {
            database_url,
            time_zone,
            config_dir,
            table_schema,
            table_name,
            read_timeout_ms,
            hour_policy,
            source_label,
            readings_file,
        })
    }

    /// 取数据库连接串；未配置时返回 `ConfigError::Missing`。
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("HIST_DATABASE_URL".to_string()))
    }

    pub fn user_config_path(&self) -> PathBuf {
        self.config_dir.join("userconfig.json")
    }

    pub fn sets_path(&self) -> PathBuf {
        self.config_dir.join("sets.json")
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_identifier_with_default(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default.to_string()),
    };
    if !is_valid_identifier(&value) {
        return Err(ConfigError::Invalid(key.to_string(), value));
    }
    Ok(value)
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
