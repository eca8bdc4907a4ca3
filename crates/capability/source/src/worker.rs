//! 专用读取线程。
//!
//! 所有读取经有界队列送到同一个线程串行执行，结果经 oneshot 返回。
//! 调用方超时后放弃等待；线程仍会完成当前读取，迟到的结果被丢弃。

use crate::error::SourceError;
use crate::traits::{BlockingReader, ValueSource};
use async_trait::async_trait;
use domain::RawValue;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const QUEUE_DEPTH: usize = 64;

struct ReadJob {
    id: String,
    reply: oneshot::Sender<Result<Option<RawValue>, SourceError>>,
}

pub struct WorkerValueSource {
    jobs: mpsc::Sender<ReadJob>,
}

impl WorkerValueSource {
    /// 启动专用线程。所有 `WorkerValueSource` 句柄释放后线程退出。
    pub fn spawn<R>(name: &str, reader: R) -> Result<Self, SourceError>
    where
        R: BlockingReader + Send + 'static,
    {
        let (jobs, rx) = mpsc::channel(QUEUE_DEPTH);
        let thread_name = name.to_string();
        thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || worker_loop(&thread_name, reader, rx))
            .map_err(|err| SourceError::Spawn(err.to_string()))?;
        Ok(Self { jobs })
    }
}

fn worker_loop<R: BlockingReader>(name: &str, mut reader: R, mut rx: mpsc::Receiver<ReadJob>) {
    while let Some(job) = rx.blocking_recv() {
        let result = reader.read(&job.id);
        if job.reply.send(result).is_err() {
            debug!(target: "hist.source", "late reading for {} discarded", job.id);
        }
    }
    debug!(target: "hist.source", "worker {} stopped", name);
}

#[async_trait]
impl ValueSource for WorkerValueSource {
    async fn read(&self, id: &str, timeout: Duration) -> Option<RawValue> {
        let (reply, answer) = oneshot::channel();
        let job = ReadJob {
            id: id.to_string(),
            reply,
        };
        // 排队等待也计入超时
        let outcome = tokio::time::timeout(timeout, async {
            self.jobs
                .send(job)
                .await
                .map_err(|_| SourceError::WorkerGone)?;
            answer.await.map_err(|_| SourceError::WorkerGone)?
        })
        .await;

        match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                warn!(target: "hist.source", "read {} failed: {}", id, err);
                None
            }
            Err(_) => {
                warn!(
                    target: "hist.source",
                    "read {} timed out after {} ms",
                    id,
                    timeout.as_millis()
                );
                None
            }
        }
    }
}
