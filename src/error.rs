use thiserror::Error;

/// 413 响应对应的固定提示
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "File is too large. Maximum size is 100MB.";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 客户端文件校验错误
///
/// 在任何网络请求之前由 `FileIngestor` 产生，`Display` 文本直接展示给用户。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 没有提供任何文件
    #[error("No files selected")]
    NoFiles,
    /// 只允许单个文件
    #[error("Only one file can be uploaded at a time ({count} provided)")]
    TooManyFiles { count: usize },
    /// 文件超过大小上限
    #[error("File is too large. Maximum size is {limit_mib}MB. ({})", .names.join(", "))]
    FileTooLarge { names: Vec<String>, limit_mib: u64 },
    /// 文件类型不符
    #[error("Invalid file type: {}", .names.join(", "))]
    UnsupportedType { names: Vec<String> },
}

/// 远端调用错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 服务端返回 413
    #[error("请求体过大 (413)")]
    PayloadTooLarge,
    /// 服务端返回其他 4xx
    #[error("请求被拒绝 ({status}): {message:?}")]
    RequestRejected { status: u16, message: Option<String> },
    /// 服务端 5xx、网络失败或响应无法解析
    #[error("服务端故障 (status={status:?}): {detail}")]
    ServerFault { status: Option<u16>, detail: String },
    /// 报告文件名无法作为单个路径段（空串、`.`、`..` 之类）
    #[error("无效的报告文件名: {name:?}")]
    InvalidArtifactName { name: String },
    /// 上传前读取本地文件失败
    #[error("读取待上传文件失败 ({name}): {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// 转换为展示给用户的单行错误文本
    ///
    /// `fallback` 是当前动作的通用失败提示。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            GatewayError::RequestRejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            GatewayError::RequestRejected { .. }
            | GatewayError::ServerFault { .. }
            | GatewayError::InvalidArtifactName { .. }
            | GatewayError::FileRead { .. } => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::ServerFault {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 报告文件名不可用
    #[error("无效的报告文件名: {name}")]
    InvalidFileName { name: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// API 地址无效
    #[error("无效的 API 地址 {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
