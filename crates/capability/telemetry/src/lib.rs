//! 追踪、批次 ID 与写入计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 计数快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub batches_aborted: u64,
    pub write_success: u64,
    pub write_skip: u64,
    pub write_failure: u64,
    pub batch_latency_ms_total: u64,
    pub batch_latency_ms_count: u64,
}

/// 进程级写入计数。
pub struct TelemetryMetrics {
    batches: AtomicU64,
    batches_aborted: AtomicU64,
    write_success: AtomicU64,
    write_skip: AtomicU64,
    write_failure: AtomicU64,
    batch_latency_ms_total: AtomicU64,
    batch_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            batches: AtomicU64::new(0),
            batches_aborted: AtomicU64::new(0),
            write_success: AtomicU64::new(0),
            write_skip: AtomicU64::new(0),
            write_failure: AtomicU64::new(0),
            batch_latency_ms_total: AtomicU64::new(0),
            batch_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            batches_aborted: self.batches_aborted.load(Ordering::Relaxed),
            write_success: self.write_success.load(Ordering::Relaxed),
            write_skip: self.write_skip.load(Ordering::Relaxed),
            write_failure: self.write_failure.load(Ordering::Relaxed),
            batch_latency_ms_total: self.batch_latency_ms_total.load(Ordering::Relaxed),
            batch_latency_ms_count: self.batch_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的批次 ID。
pub fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录写入成功次数。
pub fn record_write_success() {
    metrics().write_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录跳过次数（无值、非数值、未映射）。
pub fn record_write_skip() {
    metrics().write_skip.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入失败次数。
pub fn record_write_failure() {
    metrics().write_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录批次完成及耗时（毫秒）。
pub fn record_batch(latency_ms: u64) {
    let metrics = metrics();
    metrics.batches.fetch_add(1, Ordering::Relaxed);
    metrics
        .batch_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .batch_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录被中止的批次（表结构无法识别或连接丢失）。
pub fn record_batch_aborted() {
    metrics().batches_aborted.fetch_add(1, Ordering::Relaxed);
}
