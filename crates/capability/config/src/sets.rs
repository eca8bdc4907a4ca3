//! 标签集合（sets.json）。
//!
//! 一个集合是一组「测点 → 目标标签」映射，每项声明自己的聚合窗口。

use crate::ConfigError;
use crate::user_config::write_json;
use domain::{TagWriteRequest, WindowKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetItem {
    pub source_id: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub target_tag_id: i32,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_formula")]
    pub formula: String,
    #[serde(default = "default_aggregation")]
    pub aggregation: WindowKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_formula() -> String {
    "x".to_string()
}

fn default_aggregation() -> WindowKind {
    WindowKind::Hour
}

fn default_enabled() -> bool {
    true
}

impl SetItem {
    pub fn to_request(&self) -> TagWriteRequest {
        TagWriteRequest::new(&self.source_id, &self.alias, self.target_tag_id)
            .with_formula(&self.formula)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSet {
    #[serde(default = "new_set_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<SetItem>,
}

fn new_set_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl TagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_set_id(),
            name: name.into(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagSetFile {
    pub sets: Vec<TagSet>,
}

impl TagSetFile {
    /// 读取集合文件；不存在时返回空集合并写回。
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let file = Self::default();
            file.save(path)?;
            return Ok(file);
        }
        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.display().to_string(), err.to_string()))?;
        serde_json::from_str(&text)
            .map_err(|err| ConfigError::Parse(path.display().to_string(), err.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        write_json(path, self)
    }

    /// 某窗口类型下的写入请求：启用、聚合类型匹配、且配置了目标 ID 或别名。
    ///
    /// `set_name` 为 None 时取所有集合。
    pub fn requests_for(&self, kind: WindowKind, set_name: Option<&str>) -> Vec<TagWriteRequest> {
        self.sets
            .iter()
            .filter(|set| set_name.is_none_or(|name| set.name == name))
            .flat_map(|set| set.items.iter())
            .filter(|item| item.enabled && item.aggregation == kind)
            .map(SetItem::to_request)
            .filter(TagWriteRequest::is_mapped)
            .collect()
    }
}
