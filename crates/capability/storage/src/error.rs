//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - SQL 执行错误（单条写入失败，批次继续）
//! - 连接错误（批次中止）
//! - 表结构无法识别（批次中止）

/// 错误分类，决定编排层是跳过单项还是中止批次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Query,
    Connection,
    SchemaAmbiguous,
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(StorageErrorKind::Query, message)
    }

    pub fn with_kind(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// 连接已不可用（连接池关闭、超时或 IO 错误）。
    pub fn is_connection(&self) -> bool {
        self.kind == StorageErrorKind::Connection
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StorageErrorKind::Connection,
            _ => StorageErrorKind::Query,
        };
        Self::with_kind(kind, err.to_string())
    }
}
