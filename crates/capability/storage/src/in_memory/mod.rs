//! 内存存储实现模块
//!
//! 仅用于测试和本地演示。
//!
//! 包含以下实现：
//! - TagDataStore: InMemoryTagDataStore

pub mod tag_data;

pub use tag_data::*;
