//! 远端网关契约 - 基础设施层
//!
//! 控制器只依赖这个 trait，测试时可替换为内存实现

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::record::{ErrorRecord, OutputArtifact};
use crate::models::upload::UploadBatch;

/// 对账服务的五个远端操作，加上报告下载
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// `POST /upload-pdfs`
    async fn upload_error_docs(&self, batch: UploadBatch) -> Result<(), GatewayError>;

    /// `POST /upload-import`
    async fn upload_import_file(&self, batch: UploadBatch) -> Result<(), GatewayError>;

    /// `POST /process-data`
    async fn trigger_processing(&self) -> Result<OutputArtifact, GatewayError>;

    /// `GET /view-processed`
    async fn fetch_aggregated_records(&self) -> Result<Vec<ErrorRecord>, GatewayError>;

    /// `POST /clear`
    async fn clear_session(&self) -> Result<(), GatewayError>;

    /// `GET /download/{filename}`
    async fn download_report(&self, artifact: &OutputArtifact) -> Result<Vec<u8>, GatewayError>;
}
