//! HTTP 网关 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"调用对账服务"的能力

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, GatewayError};
use crate::infrastructure::gateway::RemoteGateway;
use crate::models::record::{ErrorRecord, OutputArtifact, ProcessResponse, RecordsResponse};
use crate::models::upload::{FileHandle, FileSource, UploadBatch};

/// 服务端错误响应体 `{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP 网关
///
/// 职责：
/// - 持有 reqwest 客户端和服务地址
/// - 把状态码分类为 `GatewayError`
/// - 不认识会话状态，不做重试，不设超时
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// 创建新的 HTTP 网关
    ///
    /// # 参数
    /// - `base_url`: 服务地址，例如 `http://localhost:5000/api`
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), base_url)
    }

    /// 使用已有客户端创建
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "地址不能作为基础路径".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 拼接接口地址，每一段都会被百分号编码
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// 报告下载地址
    ///
    /// 文件名必须是一个完整的路径段，只由 `.` 组成的名字会被 URL 规范化吃掉。
    pub fn download_url(&self, artifact: &OutputArtifact) -> Result<Url, GatewayError> {
        let name = artifact.file_name();
        if name.chars().all(|c| c == '.') {
            return Err(GatewayError::InvalidArtifactName {
                name: name.to_string(),
            });
        }
        Ok(self.endpoint(&["download", name]))
    }

    /// 构建 multipart 表单
    async fn build_form(batch: UploadBatch) -> Result<Form, GatewayError> {
        let kind = batch.kind();
        let mut form = Form::new();

        for file in batch.into_files() {
            let media_type = file
                .media_type
                .clone()
                .unwrap_or_else(|| kind.media_type_for(&file).to_string());
            let FileHandle { name, source, .. } = file;

            let data = match source {
                FileSource::Memory(data) => data,
                FileSource::Path(path) => tokio::fs::read(&path)
                    .await
                    .map_err(|source| GatewayError::FileRead {
                        name: name.clone(),
                        source,
                    })?,
            };

            debug!("附加上传文件: {} ({} 字节)", name, data.len());

            let part = Part::bytes(data).file_name(name).mime_str(&media_type)?;
            form = form.part(kind.form_field(), part);
        }

        Ok(form)
    }

    /// 状态码分类
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Err(GatewayError::PayloadTooLarge);
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_client_error() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(GatewayError::RequestRejected {
                status: status.as_u16(),
                message,
            });
        }

        Err(GatewayError::ServerFault {
            status: Some(status.as_u16()),
            detail: body,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::ServerFault {
            status: Some(status),
            detail: format!("响应解析失败: {}", e),
        })
    }

    async fn post_empty(&self, segment: &str) -> Result<Response, GatewayError> {
        let url = self.endpoint(&[segment]);
        debug!("POST {}", url);
        let response = self.client.post(url).send().await?;
        Self::check(response).await
    }

    async fn post_batch(&self, segment: &str, batch: UploadBatch) -> Result<(), GatewayError> {
        let url = self.endpoint(&[segment]);
        debug!("POST {} ({} 个文件)", url, batch.len());
        let form = Self::build_form(batch).await?;
        let response = self.client.post(url).multipart(form).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn upload_error_docs(&self, batch: UploadBatch) -> Result<(), GatewayError> {
        self.post_batch("upload-pdfs", batch).await
    }

    async fn upload_import_file(&self, batch: UploadBatch) -> Result<(), GatewayError> {
        self.post_batch("upload-import", batch).await
    }

    async fn trigger_processing(&self) -> Result<OutputArtifact, GatewayError> {
        let response = self.post_empty("process-data").await?;
        let body: ProcessResponse = Self::json(response).await?;
        Ok(body.output_file)
    }

    async fn fetch_aggregated_records(&self) -> Result<Vec<ErrorRecord>, GatewayError> {
        let url = self.endpoint(&["view-processed"]);
        debug!("GET {}", url);
        let response = Self::check(self.client.get(url).send().await?).await?;
        let body: RecordsResponse = Self::json(response).await?;
        Ok(body.records)
    }

    async fn clear_session(&self) -> Result<(), GatewayError> {
        self.post_empty("clear").await?;
        Ok(())
    }

    async fn download_report(&self, artifact: &OutputArtifact) -> Result<Vec<u8>, GatewayError> {
        let url = self.download_url(artifact)?;
        debug!("GET {}", url);
        let response = Self::check(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
