//! 内置读数来源。

use crate::error::SourceError;
use crate::traits::BlockingReader;
use domain::RawValue;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// 内存读数（测试与演示）。
#[derive(Debug, Clone, Default)]
pub struct StaticReader {
    values: HashMap<String, RawValue>,
}

impl StaticReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: RawValue) -> Self {
        self.values.insert(id.into(), value);
        self
    }
}

impl BlockingReader for StaticReader {
    fn read(&mut self, id: &str) -> Result<Option<RawValue>, SourceError> {
        Ok(self.values.get(id).cloned())
    }
}

/// 读数快照文件 `{ "<id>": <value>, ... }`，每次读取都重新加载。
///
/// 由外部采集程序定期覆盖写入；null、数组、对象视为无值。
#[derive(Debug, Clone)]
pub struct JsonFileReader {
    path: PathBuf,
}

impl JsonFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BlockingReader for JsonFileReader {
    fn read(&mut self, id: &str) -> Result<Option<RawValue>, SourceError> {
        let name = self.path.display().to_string();
        let text = fs::read_to_string(&self.path)
            .map_err(|err| SourceError::Io(name.clone(), err.to_string()))?;
        let readings: HashMap<String, Value> = serde_json::from_str(&text)
            .map_err(|err| SourceError::Parse(name, err.to_string()))?;
        Ok(readings.get(id).and_then(json_to_raw))
    }
}

fn json_to_raw(value: &Value) -> Option<RawValue> {
    match value {
        Value::Bool(v) => Some(RawValue::Bool(*v)),
        Value::Number(n) => match n.as_i64() {
            Some(v) => Some(RawValue::I64(v)),
            None => n.as_f64().map(RawValue::F64),
        },
        Value::String(v) => Some(RawValue::String(v.clone())),
        _ => None,
    }
}
