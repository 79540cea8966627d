//! 工作流控制器 - 流程层
//!
//! 核心职责：定义一次对账会话的状态机
//!
//! 动作顺序（由调用方决定）：
//! 1. submit_error_docs → 上传错误 PDF（可多次，文件名累计）
//! 2. submit_import_file → 上传进口记录表
//! 3. trigger_processing → 服务端匹配并生成报告
//! 4. clear_session → 回到初始状态
//!
//! 所有失败都在动作边界转换为 `SessionState::error` 中的一行文本，不向上抛出。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::RemoteGateway;
use crate::models::session::{SessionState, WorkflowPhase};
use crate::models::upload::{BatchKind, FileHandle};
use crate::services::file_ingestor::FileIngestor;
use crate::services::progress_presenter::{ProgressPresenter, StatusLine};

const UPLOAD_PDFS_FAILED: &str = "Failed to upload PDF files";
const UPLOAD_IMPORT_FAILED: &str = "Failed to upload import file";
const PROCESS_FAILED: &str = "Failed to process data";
const FETCH_RECORDS_FAILED: &str = "Failed to fetch processed data";
const CLEAR_FAILED: &str = "Failed to clear uploads";

/// 动作结果
///
/// 只用于调用方判断分支，具体错误文本已写入会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 远端调用成功，状态已更新
    Completed,
    /// 文件校验未通过，只设置了 `error`
    Rejected,
    /// 前置条件不满足（存在错误时触发处理），状态未变
    Blocked,
    /// 远端调用失败，`error` 已设置
    Failed,
    /// 已有动作在执行，本次未做任何修改
    Busy,
}

impl ActionOutcome {
    pub fn is_completed(self) -> bool {
        self == ActionOutcome::Completed
    }
}

/// 在途动作标记，离开作用域时自动释放
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 工作流控制器
///
/// - 独占 `SessionState`，外部只能拿到快照
/// - 同一时间只允许一个动作在途，其余直接返回 `Busy`
/// - 状态锁从不跨越 await
pub struct WorkflowController {
    gateway: Arc<dyn RemoteGateway>,
    ingestor: FileIngestor,
    refresh_after_upload: bool,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl WorkflowController {
    /// 创建新的控制器
    pub fn new(gateway: Arc<dyn RemoteGateway>, ingestor: FileIngestor) -> Self {
        Self {
            gateway,
            ingestor,
            refresh_after_upload: true,
            state: Mutex::new(SessionState::initial()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 按配置创建
    pub fn from_config(config: &Config, gateway: Arc<dyn RemoteGateway>) -> Self {
        Self::new(gateway, FileIngestor::with_limit(config.max_upload_bytes()))
            .with_record_refresh(config.refresh_records_after_upload)
    }

    /// 上传 PDF 成功后是否刷新错误记录
    pub fn with_record_refresh(mut self, enabled: bool) -> Self {
        self.refresh_after_upload = enabled;
        self
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.lock().phase
    }

    /// 当前状态行
    pub fn status_line(&self) -> StatusLine {
        ProgressPresenter::from_state(&self.lock())
    }

    /// 是否有动作在途
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// "开始处理"是否可用
    pub fn can_trigger_processing(&self) -> bool {
        !self.is_busy() && self.lock().can_trigger_processing()
    }

    /// 上传错误 PDF
    pub async fn submit_error_docs(&self, files: Vec<FileHandle>) -> ActionOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("⚠️ 已有操作在执行，忽略 PDF 上传");
            return ActionOutcome::Busy;
        };

        let batch = match self.ingestor.validate(files, BatchKind::ErrorDocs, true) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("⚠️ PDF 校验未通过: {}", e);
                self.lock().error = Some(e.to_string());
                return ActionOutcome::Rejected;
            }
        };

        let names = batch.file_names();
        self.update(|s| {
            s.phase = WorkflowPhase::UploadingErrorDocs;
            s.status_message = "Uploading PDF files...".to_string();
            s.error = None;
            s.output_artifact = None;
        });
        info!("📤 正在上传 {} 个 PDF: {:?}", names.len(), names);

        if let Err(e) = self.gateway.upload_error_docs(batch).await {
            warn!("❌ PDF 上传失败: {}", e);
            self.fail(e.user_message(UPLOAD_PDFS_FAILED));
            return ActionOutcome::Failed;
        }

        let count = names.len();
        self.lock().uploaded_pdf_names.extend(names);

        if self.refresh_after_upload {
            match self.gateway.fetch_aggregated_records().await {
                Ok(records) => {
                    debug!("刷新错误记录: {} 条", records.len());
                    self.lock().records = records;
                }
                Err(e) => {
                    warn!("❌ 刷新错误记录失败: {}", e);
                    self.fail(e.user_message(UPLOAD_PDFS_FAILED));
                    return ActionOutcome::Failed;
                }
            }
        }

        self.update(|s| {
            s.phase = WorkflowPhase::Idle;
            s.status_message = format!("Successfully processed {} PDF files", count);
        });
        info!("✓ PDF 上传完成: {} 个", count);

        ActionOutcome::Completed
    }

    /// 上传进口记录表
    pub async fn submit_import_file(&self, files: Vec<FileHandle>) -> ActionOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("⚠️ 已有操作在执行，忽略进口记录表上传");
            return ActionOutcome::Busy;
        };

        let batch = match self.ingestor.validate(files, BatchKind::ImportFile, false) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("⚠️ 进口记录表校验未通过: {}", e);
                self.lock().error = Some(e.to_string());
                return ActionOutcome::Rejected;
            }
        };

        self.update(|s| {
            s.phase = WorkflowPhase::UploadingImportFile;
            s.status_message = "Uploading import record file...".to_string();
            s.error = None;
            s.output_artifact = None;
        });
        info!("📤 正在上传进口记录表: {:?}", batch.file_names());

        if let Err(e) = self.gateway.upload_import_file(batch).await {
            warn!("❌ 进口记录表上传失败: {}", e);
            self.fail(e.user_message(UPLOAD_IMPORT_FAILED));
            return ActionOutcome::Failed;
        }

        self.update(|s| {
            s.phase = WorkflowPhase::Idle;
            s.status_message = "Successfully processed import record file".to_string();
        });
        info!("✓ 进口记录表上传完成");

        ActionOutcome::Completed
    }

    /// 触发服务端处理
    ///
    /// 存在错误时直接返回 `Blocked`，不发起请求。
    pub async fn trigger_processing(&self) -> ActionOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("⚠️ 已有操作在执行，忽略处理请求");
            return ActionOutcome::Busy;
        };

        if !self.lock().can_trigger_processing() {
            warn!("⚠️ 存在未解决的错误，处理请求被禁用");
            return ActionOutcome::Blocked;
        }

        self.update(|s| {
            s.phase = WorkflowPhase::Processing;
            s.status_message = "Processing data...".to_string();
            s.error = None;
            s.output_artifact = None;
        });
        info!("⚙️ 正在请求服务端处理...");

        match self.gateway.trigger_processing().await {
            Ok(artifact) => {
                info!("✓ 处理完成，报告: {}", artifact);
                self.update(|s| {
                    s.output_artifact = Some(artifact);
                    s.status_message = "Data processing complete".to_string();
                    s.phase = WorkflowPhase::Complete;
                });
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!("❌ 处理失败: {}", e);
                self.fail(e.user_message(PROCESS_FAILED));
                ActionOutcome::Failed
            }
        }
    }

    /// 重新拉取错误记录，不改变阶段
    pub async fn refresh_records(&self) -> ActionOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("⚠️ 已有操作在执行，忽略记录刷新");
            return ActionOutcome::Busy;
        };

        match self.gateway.fetch_aggregated_records().await {
            Ok(records) => {
                info!("✓ 获取到 {} 条错误记录", records.len());
                self.lock().records = records;
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!("❌ 获取错误记录失败: {}", e);
                self.lock().error = Some(e.user_message(FETCH_RECORDS_FAILED));
                ActionOutcome::Failed
            }
        }
    }

    /// 清空会话
    ///
    /// 失败时只设置 `error`，其余状态保持不变。
    pub async fn clear_session(&self) -> ActionOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("⚠️ 已有操作在执行，忽略清空请求");
            return ActionOutcome::Busy;
        };

        match self.gateway.clear_session().await {
            Ok(()) => {
                *self.lock() = SessionState::initial();
                info!("🧹 会话已清空");
                ActionOutcome::Completed
            }
            Err(e) => {
                warn!("❌ 清空会话失败: {}", e);
                self.lock().error = Some(e.user_message(CLEAR_FAILED));
                ActionOutcome::Failed
            }
        }
    }

    // ========== 状态辅助方法 ==========

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.lock());
    }

    /// 远端失败：记录错误并进入 Failed，报告引用随之失效
    fn fail(&self, message: String) {
        self.update(|s| {
            s.error = Some(message);
            s.phase = WorkflowPhase::Failed;
            s.output_artifact = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_is_exclusive() {
        let flag = AtomicBool::new(false);

        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());

        drop(first);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlight::acquire(&flag).is_some());
    }
}
