//! 用户配置（userconfig.json）。

use crate::ConfigError;
use crate::validation::validate_period_settings;
use domain::PeriodSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 用户可编辑配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    pub period: PeriodSettings,
}

impl UserConfig {
    /// 读取配置。
    ///
    /// - 文件不存在：返回出厂配置并尝试写回
    /// - 文件存在但无法解析（含非法的 `HH:mm` 班次时间）：返回 `ConfigError::Parse`，不覆盖原文件
    /// - 解析成功但校验失败：返回 `ConfigError::Invalid`
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            if let Err(err) = config.save(path) {
                warn!(target: "hist.config", "user config not written: {}", err);
            }
            return Ok(config);
        }

        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.display().to_string(), err.to_string()))?;
        let config = serde_json::from_str::<UserConfig>(&text)
            .map_err(|err| ConfigError::Parse(path.display().to_string(), err.to_string()))?;
        validate_period_settings(&config.period)?;
        Ok(config)
    }

    /// 校验后写入（格式化 JSON）。
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        validate_period_settings(&self.period)?;
        write_json(path, self)?;
        info!(target: "hist.config", "user config saved: {}", path.display());
        Ok(())
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .map_err(|err| ConfigError::Io(dir.display().to_string(), err.to_string()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| ConfigError::Parse(path.display().to_string(), err.to_string()))?;
    fs::write(path, json).map_err(|err| ConfigError::Io(path.display().to_string(), err.to_string()))
}
