/// 测点读取错误。对编排层而言都等同于「无值」。
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("value source worker stopped")]
    WorkerGone,
    #[error("failed to start value source worker: {0}")]
    Spawn(String),
    #[error("readings file {0}: {1}")]
    Io(String, String),
    #[error("readings file {0} is not valid json: {1}")]
    Parse(String, String),
    #[error("source rejected {0}: {1}")]
    Rejected(String, String),
}
