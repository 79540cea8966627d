//! # Entry Error Reconcile
//!
//! 报关错误对账客户端：上传错误 PDF 和进口记录表，触发服务端匹配，查看并下载结果
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露远端调用能力
//! - `RemoteGateway` - 远端契约；`HttpGateway` - reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `FileIngestor` - 上传前的文件校验
//! - `AggregationView` - 按报关单号分组
//! - `ProgressPresenter` - 状态行推导
//! - `ReportWriter` - 报告落盘
//!
//! ### ③ 流程层（Workflow）
//! - `WorkflowController` - 会话状态机，独占 `SessionState`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 一次完整会话的调度

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, GatewayError, ValidationError};
pub use infrastructure::{HttpGateway, RemoteGateway};
pub use models::{
    BatchKind, ErrorRecord, FileHandle, OutputArtifact, SessionState, UploadBatch, WorkflowPhase,
};
pub use orchestrator::App;
pub use services::{AggregationView, FileIngestor, ProgressPresenter, StatusLine};
pub use workflow::{ActionOutcome, WorkflowController};
