use crate::error::SourceError;
use async_trait::async_trait;
use domain::RawValue;
use std::collections::HashMap;
use std::time::Duration;

/// 外部测点源（异步边界）。
///
/// 超时或读取失败一律返回 `None`，由调用方按「无值」跳过。
#[async_trait]
pub trait ValueSource: Send + Sync {
    async fn read(&self, id: &str, timeout: Duration) -> Option<RawValue>;

    /// 一次批次快照：每个不同的 id 只读一次。
    async fn read_snapshot(
        &self,
        ids: &[String],
        timeout: Duration,
    ) -> HashMap<String, Option<RawValue>> {
        let mut snapshot = HashMap::with_capacity(ids.len());
        for id in ids {
            if snapshot.contains_key(id) {
                continue;
            }
            let value = self.read(id, timeout).await;
            snapshot.insert(id.clone(), value);
        }
        snapshot
    }
}

/// 设备驱动侧的阻塞读取。
///
/// 实现只会在 `WorkerValueSource` 的专用线程上被调用，可以持有非线程安全的句柄。
pub trait BlockingReader {
    fn read(&mut self, id: &str) -> Result<Option<RawValue>, SourceError>;
}
