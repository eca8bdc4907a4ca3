//! # Hist Storage 模块
//!
//! tag_data 表的结构识别与幂等写入。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`TagDataStore`，只包含写入需要的语句
//! 2. **数据模型层** (`models.rs`)：新旧两种表的行结构
//! 3. **错误处理层** (`error.rs`)：带分类的 `StorageError`
//! 4. **结构识别** (`schema.rs`)：按列名判定 Legacy / Current
//! 5. **写入器** (`writer.rs`)：`TagDataWriter { Legacy, Current }`，每批次选定一次
//! 6. **连接管理层** (`connection.rs`)：连接池与连通性检查
//! 7. **实现层**：
//!    - `in_memory/`：内存实现（测试用）
//!    - `postgres/`：PostgreSQL 实现（生产环境使用）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use hist_storage::{PgTagDataStore, TagDataStore, TagDataWriter, detect_schema};
//!
//! let store = PgTagDataStore::connect(&database_url, "public", "tag_data").await?;
//! let kind = detect_schema(&store.table_columns().await?)?;
//! let writer = TagDataWriter::for_schema(kind, "hist-writer");
//! writer.write(&store, &request, &window, 42.0).await?;
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod traits;
pub mod writer;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use schema::*;
pub use traits::*;
pub use writer::*;

pub use in_memory::{InMemoryTagDataStore, StatementCounts};
pub use postgres::{PgTagDataStore, quote_ident};
