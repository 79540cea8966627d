//! 文件校验服务 - 业务能力层
//!
//! 只负责"这批文件能不能离开客户端"的判断，不发起任何网络请求

use crate::error::ValidationError;
use crate::models::upload::{BatchKind, FileHandle, UploadBatch};

/// 默认单文件上限：100 MiB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// 文件校验服务
///
/// 校验顺序：数量 → 大小 → 类型。任何一项不通过则整批拒绝。
#[derive(Debug, Clone, Copy)]
pub struct FileIngestor {
    max_file_bytes: u64,
}

impl FileIngestor {
    pub fn new() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    /// 使用自定义大小上限创建
    pub fn with_limit(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// 校验一组待上传文件
    ///
    /// # 参数
    /// - `files`: 用户选择的文件，顺序即上传顺序
    /// - `kind`: 期望的批次类型
    /// - `allow_multiple`: 是否允许多个文件（进口记录表始终只允许一个）
    ///
    /// # 返回
    /// 通过时返回保持输入顺序的 `UploadBatch`
    pub fn validate(
        &self,
        files: Vec<FileHandle>,
        kind: BatchKind,
        allow_multiple: bool,
    ) -> Result<UploadBatch, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }

        if files.len() > 1 && !(allow_multiple && kind.allows_multiple()) {
            return Err(ValidationError::TooManyFiles { count: files.len() });
        }

        let oversized: Vec<String> = files
            .iter()
            .filter(|f| f.size > self.max_file_bytes)
            .map(|f| f.name.clone())
            .collect();
        if !oversized.is_empty() {
            return Err(ValidationError::FileTooLarge {
                names: oversized,
                limit_mib: self.max_file_bytes / (1024 * 1024),
            });
        }

        let unsupported: Vec<String> = files
            .iter()
            .filter(|f| !Self::matches_kind(f, kind))
            .map(|f| f.name.clone())
            .collect();
        if !unsupported.is_empty() {
            return Err(ValidationError::UnsupportedType { names: unsupported });
        }

        Ok(UploadBatch::new(kind, files))
    }

    /// 扩展名或声明的媒体类型任一匹配即可
    fn matches_kind(file: &FileHandle, kind: BatchKind) -> bool {
        let ext_ok = file
            .extension()
            .map(|ext| kind.allowed_extensions().contains(&ext.as_str()))
            .unwrap_or(false);
        let media_ok = file
            .media_type
            .as_deref()
            .map(|m| kind.allowed_media_types().contains(&m))
            .unwrap_or(false);
        ext_ok || media_ok
    }
}

impl Default for FileIngestor {
    fn default() -> Self {
        Self::new()
    }
}
