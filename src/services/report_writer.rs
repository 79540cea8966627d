//! 报告写入服务 - 业务能力层
//!
//! 只负责把下载到的报告和汇总文本落盘，不关心流程

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{AppResult, FileError};
use crate::models::record::OutputArtifact;
use crate::services::aggregation_view::AggregationView;

/// 汇总文本文件名
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

/// 报告写入服务
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 写入报告文件
    ///
    /// 只取报告名的最后一段路径，避免写到输出目录之外。
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn write_report(&self, artifact: &OutputArtifact, data: &[u8]) -> AppResult<PathBuf> {
        let file_name = Path::new(artifact.file_name())
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| FileError::InvalidFileName {
                name: artifact.file_name().to_string(),
            })?;

        let path = self.output_dir.join(file_name);
        self.write(&path, data).await?;

        debug!("写入报告: {} ({} 字节)", path.display(), data.len());
        Ok(path)
    }

    /// 写入分组汇总文本
    pub async fn write_summary(&self, view: &AggregationView<'_>) -> AppResult<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE_NAME);
        self.write(&path, view.render_text().as_bytes()).await?;
        Ok(path)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FileError::write_failed(self.output_dir.display().to_string(), e))?;

        fs::write(path, data)
            .await
            .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

        Ok(())
    }
}
