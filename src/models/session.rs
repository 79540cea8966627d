//! 会话状态
//!
//! 唯一可变的聚合体，只由 `WorkflowController` 修改

use super::record::{ErrorRecord, OutputArtifact};

/// 工作流阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    UploadingErrorDocs,
    UploadingImportFile,
    Processing,
    Complete,
    Failed,
}

impl WorkflowPhase {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::UploadingErrorDocs => "uploading-error-docs",
            WorkflowPhase::UploadingImportFile => "uploading-import-file",
            WorkflowPhase::Processing => "processing",
            WorkflowPhase::Complete => "complete",
            WorkflowPhase::Failed => "failed",
        }
    }

    /// 是否有远端请求正在进行
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            WorkflowPhase::UploadingErrorDocs
                | WorkflowPhase::UploadingImportFile
                | WorkflowPhase::Processing
        )
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub phase: WorkflowPhase,
    pub status_message: String,
    pub error: Option<String>,
    /// 已上传的 PDF 文件名，只追加，清空会话时整体重置
    pub uploaded_pdf_names: Vec<String>,
    pub records: Vec<ErrorRecord>,
    /// 仅在 `Complete` 阶段非空
    pub output_artifact: Option<OutputArtifact>,
}

impl SessionState {
    /// 初始状态，启动和清空会话共用
    pub fn initial() -> Self {
        Self::default()
    }

    /// "开始处理"动作是否可用
    pub fn can_trigger_processing(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::initial();
        assert_eq!(state.phase, WorkflowPhase::Idle);
        assert!(state.status_message.is_empty());
        assert!(state.error.is_none());
        assert!(state.uploaded_pdf_names.is_empty());
        assert!(state.records.is_empty());
        assert!(state.output_artifact.is_none());
        assert!(state.is_initial());
        assert!(state.can_trigger_processing());
    }

    #[test]
    fn test_error_disables_processing() {
        let state = SessionState {
            error: Some("Failed to upload PDF files".to_string()),
            ..SessionState::initial()
        };
        assert!(!state.can_trigger_processing());
        assert!(!state.is_initial());
    }

    #[test]
    fn test_in_progress_phases() {
        assert!(WorkflowPhase::Processing.is_in_progress());
        assert!(WorkflowPhase::UploadingImportFile.is_in_progress());
        assert!(!WorkflowPhase::Complete.is_in_progress());
        assert!(!WorkflowPhase::Failed.is_in_progress());
    }
}
