/// 外部测点源返回的原始读数。
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    I64(i64),
    F64(f64),
    Bool(bool),
    String(String),
}

impl RawValue {
    /// 转换为可写入的数值；非有限值或无法解析的字符串返回 None。
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::I64(v) => *v as f64,
            RawValue::F64(v) => *v,
            RawValue::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::String(v) => v.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// 单个标签写入请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWriteRequest {
    /// 原始读数标识（测点 ItemId）。
    pub source_id: String,
    /// 旧表标签名；为空时使用 `source_id`。
    pub alias: String,
    /// 新表标签 ID，0 表示未设置。
    pub target_tag_id: i32,
    pub formula: String,
}

impl TagWriteRequest {
    pub fn new(source_id: impl Into<String>, alias: impl Into<String>, target_tag_id: i32) -> Self {
        Self {
            source_id: source_id.into(),
            alias: alias.into(),
            target_tag_id,
            formula: String::new(),
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// 旧表使用的标签名。
    pub fn legacy_tag_name(&self) -> &str {
        if self.alias.trim().is_empty() {
            &self.source_id
        } else {
            &self.alias
        }
    }

    /// 至少配置了目标 ID 或别名才有写入意义。
    pub fn is_mapped(&self) -> bool {
        self.target_tag_id > 0 || !self.alias.trim().is_empty()
    }
}

/// 批次写入统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ok: u64,
    pub skip: u64,
    pub fail: u64,
}

impl BatchSummary {
    pub fn total(&self) -> u64 {
        self.ok + self.skip + self.fail
    }
}
