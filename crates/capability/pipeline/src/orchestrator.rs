//! 批次写入编排。
//!
//! 一个批次：解析窗口一次、识别表结构一次、读取快照一次，然后逐项
//! 公式 → 写入，统计 ok / skip / fail。单项错误不影响其他项；只有表结构
//! 无法识别或存储连接丢失会中止剩余项。已提交的写入不回滚，也不重试。

use crate::formula;
use chrono::NaiveDateTime;
use domain::{BatchSummary, PeriodSettings, RawValue, ResolvedWindow, TagWriteRequest, WindowKind};
use hist_period::{HourPolicy, resolve_window};
use hist_source::ValueSource;
use hist_storage::{StorageError, TagDataStore, TagDataWriter, WriteOutcome, detect_schema};
use hist_telemetry::{
    new_batch_id, record_batch, record_batch_aborted, record_write_failure, record_write_skip,
    record_write_success,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, error, info, info_span, warn};

/// 编排错误（批次级）。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("schema detection failed: {0}")]
    Schema(StorageError),
    #[error("storage connection lost: {source}")]
    ConnectionLost {
        /// 中止前已统计的结果
        partial: BatchSummary,
        source: StorageError,
    },
}

/// 跳过原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 未读到值（不存在、超时或读取失败）
    NoValue,
    NotNumeric,
    /// 新表缺少目标 tag id
    Unmapped,
}

/// 单项结果。
#[derive(Debug)]
pub enum ItemOutcome {
    Written(WriteOutcome),
    Skipped(SkipReason),
    Failed(StorageError),
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub read_timeout: Duration,
    pub hour_policy: HourPolicy,
    /// 旧表 `source` 列取值
    pub source_label: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(5000),
            hour_policy: HourPolicy::default(),
            source_label: "hist-writer".to_string(),
        }
    }
}

/// 写入编排入口。
#[derive(Clone)]
pub struct WriteOrchestrator {
    source: Arc<dyn ValueSource>,
    store: Arc<dyn TagDataStore>,
    config: OrchestratorConfig,
}

impl WriteOrchestrator {
    pub fn new(
        source: Arc<dyn ValueSource>,
        store: Arc<dyn TagDataStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// 执行一个批次，返回 ok / skip / fail 统计。
    pub async fn run_batch(
        &self,
        settings: &PeriodSettings,
        kind: WindowKind,
        requests: &[TagWriteRequest],
        local_now: NaiveDateTime,
    ) -> Result<BatchSummary, PipelineError> {
        let batch_id = new_batch_id();
        let span = info_span!("batch", batch_id = %batch_id, kind = %kind);
        let started = Instant::now();
        let result = self
            .execute(settings, kind, requests, local_now)
            .instrument(span)
            .await;
        match &result {
            Ok(_) => record_batch(started.elapsed().as_millis() as u64),
            Err(_) => record_batch_aborted(),
        }
        result
    }

    async fn execute(
        &self,
        settings: &PeriodSettings,
        kind: WindowKind,
        requests: &[TagWriteRequest],
        local_now: NaiveDateTime,
    ) -> Result<BatchSummary, PipelineError> {
        let window = resolve_window(kind, local_now, settings, self.config.hour_policy);
        info!(
            target: "hist.pipeline",
            policy = %self.config.hour_policy,
            "window resolved: start={} date={} hour={:?} shift={:?} items={}",
            window.period_start(),
            window.production_date(),
            window.hour_no(),
            window.shift_no(),
            requests.len()
        );

        let writer = self.detect_writer().await?;

        let ids: Vec<String> = requests
            .iter()
            .map(|request| request.source_id.clone())
            .collect();
        let snapshot = self.source.read_snapshot(&ids, self.config.read_timeout).await;

        let mut summary = BatchSummary::default();
        for request in requests {
            let outcome = self
                .process_item(&writer, request, &window, &snapshot, local_now)
                .await;
            match outcome {
                ItemOutcome::Written(_) => {
                    summary.ok += 1;
                    record_write_success();
                }
                ItemOutcome::Skipped(reason) => {
                    summary.skip += 1;
                    record_write_skip();
                    warn!(target: "hist.pipeline", "skip {}: {:?}", request.source_id, reason);
                }
                ItemOutcome::Failed(err) => {
                    summary.fail += 1;
                    record_write_failure();
                    error!(target: "hist.pipeline", "write {} failed: {}", request.source_id, err);
                    if err.is_connection() {
                        return Err(PipelineError::ConnectionLost {
                            partial: summary,
                            source: err,
                        });
                    }
                }
            }
        }

        info!(
            target: "hist.pipeline",
            "batch done: ok={} skip={} fail={}",
            summary.ok,
            summary.skip,
            summary.fail
        );
        Ok(summary)
    }

    /// 每个批次都重新读取列清单。
    async fn detect_writer(&self) -> Result<TagDataWriter, PipelineError> {
        let columns = self.store.table_columns().await.map_err(|err| {
            if err.is_connection() {
                PipelineError::ConnectionLost {
                    partial: BatchSummary::default(),
                    source: err,
                }
            } else {
                PipelineError::Schema(err)
            }
        })?;
        let kind = detect_schema(&columns).map_err(PipelineError::Schema)?;
        info!(target: "hist.pipeline", "target table schema: {:?}", kind);
        Ok(TagDataWriter::for_schema(kind, self.config.source_label.clone()))
    }

    async fn process_item(
        &self,
        writer: &TagDataWriter,
        request: &TagWriteRequest,
        window: &ResolvedWindow,
        snapshot: &HashMap<String, Option<RawValue>>,
        local_now: NaiveDateTime,
    ) -> ItemOutcome {
        if !writer.accepts(request) {
            return ItemOutcome::Skipped(SkipReason::Unmapped);
        }
        let Some(raw) = snapshot.get(&request.source_id).and_then(Option::as_ref) else {
            return ItemOutcome::Skipped(SkipReason::NoValue);
        };
        let Some(raw) = raw.as_f64() else {
            return ItemOutcome::Skipped(SkipReason::NotNumeric);
        };
        let value = formula::evaluate(&request.formula, raw, local_now, window.shift_no());
        match writer
            .write(self.store.as_ref(), request, window, value)
            .await
        {
            Ok(outcome) => ItemOutcome::Written(outcome),
            Err(err) => ItemOutcome::Failed(err),
        }
    }
}
