//! 进度展示 - 业务能力层
//!
//! 纯函数：由 (阶段, 状态文本, 错误) 推导唯一的状态行

use crate::models::session::{SessionState, WorkflowPhase};

/// 状态行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub visible: bool,
    pub text: String,
    /// 只有在无错误的状态显示时才为 true
    pub busy: bool,
    pub phase: WorkflowPhase,
}

pub struct ProgressPresenter;

impl ProgressPresenter {
    pub fn present(phase: WorkflowPhase, status_message: &str, error: Option<&str>) -> StatusLine {
        let visible = !status_message.is_empty() || error.is_some();
        let text = error.unwrap_or(status_message).to_string();
        StatusLine {
            visible,
            text,
            busy: visible && error.is_none(),
            phase,
        }
    }

    pub fn from_state(state: &SessionState) -> StatusLine {
        Self::present(state.phase, &state.status_message, state.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_nothing_to_show() {
        let line = ProgressPresenter::present(WorkflowPhase::Idle, "", None);
        assert!(!line.visible);
        assert!(!line.busy);
        assert!(line.text.is_empty());
    }

    #[test]
    fn test_status_is_busy() {
        let line = ProgressPresenter::present(WorkflowPhase::Processing, "Processing data...", None);
        assert!(line.visible);
        assert!(line.busy);
        assert_eq!(line.text, "Processing data...");
    }

    #[test]
    fn test_error_replaces_status() {
        let line = ProgressPresenter::present(
            WorkflowPhase::Failed,
            "Uploading PDF files...",
            Some("Failed to upload PDF files"),
        );
        assert!(line.visible);
        assert!(!line.busy);
        assert_eq!(line.text, "Failed to upload PDF files");
    }

    #[test]
    fn test_error_without_status_is_visible() {
        let line = ProgressPresenter::present(WorkflowPhase::Idle, "", Some("Invalid file type: a.txt"));
        assert!(line.visible);
        assert!(!line.busy);
    }

    #[test]
    fn test_from_state() {
        let state = SessionState::initial();
        assert_eq!(
            ProgressPresenter::from_state(&state),
            ProgressPresenter::present(WorkflowPhase::Idle, "", None)
        );
    }
}
