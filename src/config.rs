use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use url::Url;
use crate::core::{Result, UploadError};
use crate::view::ColumnSpec;

pub const DEFAULT_CONFIG_FILE: &str = "dropzone.toml";

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub upload: UploadConfig,
    #[serde(default)]
    pub table: TableConfig,
}

/// 上传配置
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// 获取预签名地址的接口
    pub endpoint_url: String,
    /// 单个文件大小上限（字节）
    pub max_file_size: Option<u64>,
    /// 允许的 MIME 类型，为空表示不限制
    #[serde(default)]
    pub allowed_types: BTreeSet<String>,
    /// 单个请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl UploadConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            max_file_size: None,
            allowed_types: BTreeSet::new(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint_url)
            .map_err(|err| UploadError::config(format!("Invalid endpoint_url {:?}: {}", self.endpoint_url, err)))?;
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TableConfig {
    pub columns: Option<Vec<ColumnSpec>>,
}

impl TableConfig {
    pub fn columns(&self) -> Vec<ColumnSpec> {
        self.columns
            .clone()
            .unwrap_or_else(crate::view::default_columns)
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|err| UploadError::config(err.to_string()))?;
        config.upload.validate()?;
        Ok(config)
    }

    pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| UploadError::config(format!("Can't read {}: {}", path.display(), err)))?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ColumnKey;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(r#"
            log_level = "debug"

            [upload]
            endpoint_url = "http://localhost:8080/presign"
            max_file_size = 10485760
            allowed_types = ["image/png", "image/jpeg"]

            [[table.columns]]
            key = "name"
            label = "File"
            sortable = true
            filterable = true
        "#).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.upload.max_file_size, Some(10 * 1024 * 1024));
        assert!(config.upload.allowed_types.contains("image/png"));
        assert_eq!(config.upload.timeout_secs, 300);

        let columns = config.table.columns();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].key, ColumnKey::Name);
        assert_eq!(columns[0].width, None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse(r#"
            [upload]
            endpoint_url = "https://example.com/api/upload"
        "#).unwrap();

        assert_eq!(config.log_level, "info");
        assert!(config.upload.allowed_types.is_empty());
        assert_eq!(config.upload.max_file_size, None);
        assert_eq!(config.table.columns().len(), crate::view::default_columns().len());
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = Config::parse(r#"
            [upload]
            endpoint_url = "not a url"
        "#);

        assert!(matches!(result, Err(UploadError::Config(_))));
    }

    #[test]
    fn test_missing_upload_section() {
        assert!(Config::parse("log_level = \"info\"").is_err());
    }
}
