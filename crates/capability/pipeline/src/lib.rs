//! 写入编排：读取快照 → 公式 → 按表结构写库，统计 ok / skip / fail。

pub mod formula;
pub mod orchestrator;

pub use formula::evaluate;
pub use orchestrator::{
    ItemOutcome, OrchestratorConfig, PipelineError, SkipReason, WriteOrchestrator,
};
