//! 测点读取能力。
//!
//! 编排层只依赖异步的 `ValueSource::read(id, timeout)`；真正访问设备驱动的
//! 阻塞调用由 `WorkerValueSource` 串行化到一个专用线程上执行。
//!
//! - `traits`：`ValueSource`（异步，带超时）与 `BlockingReader`（驱动侧，阻塞）
//! - `worker`：专用线程 + 有界队列 + oneshot 回复
//! - `readers`：内存读数与 JSON 快照文件读数

pub mod error;
pub mod readers;
pub mod traits;
pub mod worker;

pub use error::SourceError;
pub use readers::{JsonFileReader, StaticReader};
pub use traits::{BlockingReader, ValueSource};
pub use worker::WorkerValueSource;
