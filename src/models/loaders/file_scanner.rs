use crate::error::{AppResult, FileError};
use crate::models::upload::{BatchKind, FileHandle};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘路径加载单个文件句柄（只读取元数据，不读取内容）
pub async fn load_file(path: &Path) -> AppResult<FileHandle> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        Err(e) => return Err(FileError::read_failed(path.display().to_string(), e).into()),
    };

    Ok(FileHandle::from_path(path, metadata.len()))
}

/// 扫描文件夹中属于指定批次类型的文件
///
/// 按文件名排序返回，子目录忽略。
pub async fn scan_folder(folder_path: &str, kind: BatchKind) -> AppResult<Vec<FileHandle>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?
    {
        let path = entry.path();
        let matches_kind = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                kind.allowed_extensions()
                    .contains(&ext.to_ascii_lowercase().as_str())
            })
            .unwrap_or(false);

        if matches_kind && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        match load_file(&path).await {
            Ok(handle) => {
                tracing::debug!("发现{}: {} ({} 字节)", kind.label(), handle.name, handle.size);
                handles.push(handle);
            }
            Err(e) => {
                tracing::warn!("读取文件信息失败 {}: {}", path.display(), e);
            }
        }
    }

    tracing::info!("在 {} 中找到 {} 个{}", folder_path, handles.len(), kind.label());

    Ok(handles)
}
