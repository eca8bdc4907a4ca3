//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池（最大连接数 8）
//! - ping：连通性检查

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// 建立 Postgres 连接池
///
/// 从数据库 URL 创建连接池，最大连接数限制为 8。
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// 执行 `select 1` 确认数据库可用。
pub async fn ping(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("select 1").execute(pool).await?;
    info!(target: "hist.storage", "database reachable");
    Ok(())
}
