//! # PostgreSQL 存储实现模块
//!
//! 生产环境使用的 `TagDataStore` 实现。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有值使用参数绑定（`$1`, `$2` 等）
//! 2. **标识符转义**：表名来自配置，引用表/列来自 `pg_constraint` 目录查询，一律双引号转义
//! 3. **连接池管理**：复用 `connect_pool` 建立的连接池（最大连接数 8）
//!
//! ## 数据库模式要求
//!
//! 新表（current）：
//! - `tagid int, periodstart timestamp, periodtype text, hourno int null, shiftno int null, value double precision`
//! - 唯一键 `(tagid, periodtype, periodstart)`，写入依赖 `on conflict ... do update`
//!
//! 旧表（legacy）：
//! - `tag_name text, date date, period text, hour_num int null, shift_num int null, value double precision, source text`
//! - 无可用的组合唯一键，写入为「先更新，零行再插入」两步
//! - `tag_name` 可能有指向标签字典表的外键
//!
//! ## 事务支持
//!
//! 每个标签独立写入，不使用跨标签事务。

pub mod tag_data;

pub use tag_data::*;
