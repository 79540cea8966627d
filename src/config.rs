use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 对账服务 API 地址（包含 `/api` 前缀）
    pub api_base_url: String,
    /// 待上传的错误 PDF 所在目录
    pub pdf_folder: String,
    /// 进口记录 Excel 文件路径
    pub import_file: String,
    /// 报告下载目录
    pub output_dir: String,
    /// 单个文件大小上限（MiB）
    pub max_upload_mib: u64,
    /// 上传 PDF 后是否立即刷新错误记录
    pub refresh_records_after_upload: bool,
    /// 运行结束后是否清空服务端会话
    pub clear_after_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            pdf_folder: "error_pdfs".to_string(),
            import_file: "imports.xlsx".to_string(),
            output_dir: "output".to_string(),
            max_upload_mib: 100,
            refresh_records_after_upload: true,
            clear_after_run: false,
            verbose_logging: false,
            output_log_file: "reconcile_log.txt".to_string(),
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 读取 `RECONCILE_CONFIG` 指向的文件（未设置时用默认值），再应用环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("RECONCILE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// 应用覆盖项，无法解析的值保留原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|v| v.trim().parse().ok())
        }

        Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(self.api_base_url),
            pdf_folder: lookup("PDF_FOLDER").unwrap_or(self.pdf_folder),
            import_file: lookup("IMPORT_FILE").unwrap_or(self.import_file),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(self.output_dir),
            max_upload_mib: parsed(lookup("MAX_UPLOAD_MIB")).unwrap_or(self.max_upload_mib),
            refresh_records_after_upload: parsed(lookup("REFRESH_RECORDS_AFTER_UPLOAD"))
                .unwrap_or(self.refresh_records_after_upload),
            clear_after_run: parsed(lookup("CLEAR_AFTER_RUN")).unwrap_or(self.clear_after_run),
            verbose_logging: parsed(lookup("VERBOSE_LOGGING")).unwrap_or(self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 单个文件大小上限（字节）
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mib.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.max_upload_bytes(), 100 * 1024 * 1024);
        assert!(config.refresh_records_after_upload);
        assert!(!config.clear_after_run);
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reconcile.toml");
        std::fs::write(
            &path,
            "api_base_url = \"http://10.0.0.5:5001/api\"\nmax_upload_mib = 20\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:5001/api");
        assert_eq!(config.max_upload_mib, 20);
        assert_eq!(config.pdf_folder, "error_pdfs");
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "max_upload_mib = \"lots\"").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::TomlParseFailed { .. })
        ));
    }

    #[test]
    fn test_overrides_skip_unparseable_values() {
        let vars: HashMap<&str, &str> = [
            ("PDF_FOLDER", "/data/cbp"),
            ("MAX_UPLOAD_MIB", "not-a-number"),
            ("CLEAR_AFTER_RUN", "true"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().with_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.pdf_folder, "/data/cbp");
        assert_eq!(config.max_upload_mib, 100);
        assert!(config.clear_after_run);
    }
}
