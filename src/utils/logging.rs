//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use std::sync::OnceLock;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::models::{ErrorRecord, SessionState};
use crate::services::StatusLine;

/// 错误描述在日志中保留的字符数
const DESCRIPTION_WIDTH: usize = 40;

static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

fn level_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化 tracing 订阅器
///
/// 在读取配置之前调用：`RUST_LOG` 优先，否则为 info。重复调用是安全的。
pub fn init() {
    let (filter, handle) = reload::Layer::new(level_filter(false));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok();

    if installed {
        let _ = FILTER_HANDLE.set(handle);
    }
}

/// 按配置切换日志级别（`RUST_LOG` 仍然优先）
pub fn set_verbose(verbose: bool) {
    if let Some(handle) = FILTER_HANDLE.get() {
        let _ = handle.reload(level_filter(verbose));
    }
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n对账会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(api_base_url: &str, max_upload_mib: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 报关错误对账客户端");
    info!("🌐 服务地址: {}", api_base_url);
    info!("📏 单文件上限: {} MB", max_upload_mib);
    info!("{}", "=".repeat(60));
}

/// 状态行前缀：进行中 ⏳，已结束 ✅，出错 ❌
pub fn status_icon(line: &StatusLine) -> &'static str {
    if !line.busy {
        "❌"
    } else if line.phase.is_in_progress() {
        "⏳"
    } else {
        "✅"
    }
}

/// 记录当前状态行
pub fn log_status(line: &StatusLine) {
    if line.visible {
        info!("[{}] {} {}", line.phase, status_icon(line), line.text);
    }
}

/// 单条错误记录的日志行，过长的描述会被截断
pub fn record_line(record: &ErrorRecord) -> String {
    format!(
        "{} | line {} | {}",
        record.error_code,
        record.line_number_7501,
        truncate_text(&record.error_description, DESCRIPTION_WIDTH)
    )
}

/// 打印最终统计信息
///
/// # 参数
/// - `state`: 会话结束时的状态快照
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(state: &SessionState, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("阶段: {}", state.phase);
    info!("📄 已上传 PDF: {}", state.uploaded_pdf_names.len());
    info!("🧾 错误记录: {}", state.records.len());
    match &state.output_artifact {
        Some(artifact) => info!("✅ 报告文件: {}", artifact),
        None => info!("❌ 未生成报告"),
    }
    if let Some(error) = &state.error {
        info!("最后错误: {}", error);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 按字符数截断，超出部分以 `...` 结尾
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
