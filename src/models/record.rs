//! 错误记录数据模型
//!
//! 服务端匹配后返回的扁平错误记录，字段名与接口 JSON 保持一致

use serde::{Deserialize, Serialize};

/// 单条错误记录
///
/// 所有字段对客户端都是不透明字符串，接收后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// 错误代码
    #[serde(rename = "Error Code", default)]
    pub error_code: String,

    /// 错误描述
    #[serde(rename = "Error Description", default)]
    pub error_description: String,

    /// 申报人代码
    #[serde(rename = "Filer Code", default)]
    pub filer_code: String,

    /// 报关单号（分组键）
    #[serde(rename = "Entry Number", default)]
    pub entry_number: String,

    /// 7501 表行号
    #[serde(rename = "7501 Line Number", default)]
    pub line_number_7501: String,
}

impl ErrorRecord {
    pub fn new(
        error_code: impl Into<String>,
        error_description: impl Into<String>,
        filer_code: impl Into<String>,
        entry_number: impl Into<String>,
        line_number_7501: impl Into<String>,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            error_description: error_description.into(),
            filer_code: filer_code.into(),
            entry_number: entry_number.into(),
            line_number_7501: line_number_7501.into(),
        }
    }
}

/// `GET /view-processed` 响应体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<ErrorRecord>,
}

/// 处理完成后生成的报告文件名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputArtifact(String);

impl OutputArtifact {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self(file_name.into())
    }

    pub fn file_name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OutputArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `POST /process-data` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    pub output_file: OutputArtifact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_uses_wire_field_names() {
        let value = json!({
            "Error Code": "F551",
            "Error Description": "EXCESS DUTY CLAIMED",
            "Filer Code": "GU6",
            "Entry Number": "60061040",
            "7501 Line Number": "25"
        });

        let record: ErrorRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.error_code, "F551");
        assert_eq!(record.entry_number, "60061040");
        assert_eq!(record.line_number_7501, "25");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["Filer Code"], "GU6");
    }

    #[test]
    fn test_process_response_output_file() {
        let response: ProcessResponse =
            serde_json::from_value(json!({ "message": "ok", "output_file": "report.xlsx" })).unwrap();
        assert_eq!(response.output_file.file_name(), "report.xlsx");
    }
}
