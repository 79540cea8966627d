//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 按固定顺序驱动一次完整的对账会话，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! session_runner::App (扫描文件 → 上传 → 处理 → 汇总 → 下载)
//!     ↓
//! workflow::WorkflowController (状态机)
//!     ↓
//! services (能力层：ingestor / aggregation / presenter / report)
//!     ↓
//! infrastructure (基础设施：RemoteGateway / HttpGateway)
//! ```
//!
//! 编排层只做调度和日志，不做业务判断。

pub mod session_runner;

pub use session_runner::App;
