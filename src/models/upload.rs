//! 上传文件与批次模型

use std::path::{Path, PathBuf};

/// 文件内容来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// 本地磁盘文件，上传时再读取
    Path(PathBuf),
    /// 已在内存中的内容
    Memory(Vec<u8>),
}

/// 待上传的单个文件句柄
///
/// `size` 是声明大小（来自文件元数据），校验只看这个值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub media_type: Option<String>,
    pub source: FileSource,
}

impl FileHandle {
    /// 从磁盘路径创建（大小由调用方从元数据读取）
    pub fn from_path(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            name,
            size,
            media_type: None,
            source: FileSource::Path(path),
        }
    }

    /// 从内存内容创建
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            media_type: None,
            source: FileSource::Memory(data),
        }
    }

    /// 覆盖声明大小
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// 设置媒体类型
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// 小写扩展名
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// 批次类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// 错误文档（PDF），可多选
    ErrorDocs,
    /// 进口记录表（Excel），只能单个
    ImportFile,
}

impl BatchKind {
    /// 允许的扩展名
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            BatchKind::ErrorDocs => &["pdf"],
            BatchKind::ImportFile => &["xlsx", "xls"],
        }
    }

    /// 允许的媒体类型
    pub fn allowed_media_types(self) -> &'static [&'static str] {
        match self {
            BatchKind::ErrorDocs => &["application/pdf"],
            BatchKind::ImportFile => &[
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.ms-excel",
            ],
        }
    }

    /// 是否允许一个批次包含多个文件
    pub fn allows_multiple(self) -> bool {
        matches!(self, BatchKind::ErrorDocs)
    }

    /// multipart 表单字段名
    pub fn form_field(self) -> &'static str {
        match self {
            BatchKind::ErrorDocs => "files",
            BatchKind::ImportFile => "file",
        }
    }

    /// 根据扩展名推断上传时使用的媒体类型
    pub fn media_type_for(self, file: &FileHandle) -> &'static str {
        match (self, file.extension().as_deref()) {
            (BatchKind::ImportFile, Some("xls")) => "application/vnd.ms-excel",
            (kind, _) => kind.allowed_media_types()[0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BatchKind::ErrorDocs => "错误文档",
            BatchKind::ImportFile => "进口记录表",
        }
    }
}

/// 已通过校验的上传批次
///
/// 只能由 `FileIngestor` 构造，非空且保持输入顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    kind: BatchKind,
    files: Vec<FileHandle>,
}

impl UploadBatch {
    pub(crate) fn new(kind: BatchKind, files: Vec<FileHandle>) -> Self {
        debug_assert!(!files.is_empty());
        Self { kind, files }
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<FileHandle> {
        self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let file = FileHandle::from_bytes("Entry1.PDF", vec![1, 2, 3]);
        assert_eq!(file.extension().as_deref(), Some("pdf"));
        assert_eq!(file.size, 3);

        let no_ext = FileHandle::from_bytes("README", Vec::new());
        assert_eq!(no_ext.extension(), None);
    }

    #[test]
    fn test_from_path_takes_file_name() {
        let file = FileHandle::from_path("/tmp/uploads/imports.xlsx", 1024);
        assert_eq!(file.name, "imports.xlsx");
        assert_eq!(file.size, 1024);
    }

    #[test]
    fn test_media_type_for_import_file() {
        let xls = FileHandle::from_bytes("old.xls", Vec::new());
        let xlsx = FileHandle::from_bytes("new.xlsx", Vec::new());
        assert_eq!(BatchKind::ImportFile.media_type_for(&xls), "application/vnd.ms-excel");
        assert_eq!(
            BatchKind::ImportFile.media_type_for(&xlsx),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(BatchKind::ErrorDocs.media_type_for(&xlsx), "application/pdf");
    }
}
