use serde::{Deserialize, Serialize};

/// 表格列可选的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Id,
    Name,
    Size,
    #[serde(alias = "content_type")]
    Type,
    Status,
    Progress,
    UploadedAt,
    RemoteKey,
    Error,
}

impl std::str::FromStr for ColumnKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "id" => Ok(ColumnKey::Id),
            "name" => Ok(ColumnKey::Name),
            "size" => Ok(ColumnKey::Size),
            "type" | "content_type" => Ok(ColumnKey::Type),
            "status" => Ok(ColumnKey::Status),
            "progress" => Ok(ColumnKey::Progress),
            "uploaded_at" | "uploadedat" => Ok(ColumnKey::UploadedAt),
            "remote_key" | "key" => Ok(ColumnKey::RemoteKey),
            "error" => Ok(ColumnKey::Error),
            other => Err(format!("Unknown column: {}", other)),
        }
    }
}

/// 列定义，只读配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnSpec {
    pub key: ColumnKey,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    /// 目前过滤总是匹配 name/type/status，这个标记不参与过滤
    #[serde(default)]
    pub filterable: bool,
    pub width: Option<u16>,
}

impl ColumnSpec {
    pub fn new(key: ColumnKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            sortable: false,
            filterable: false,
            width: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }
}

pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new(ColumnKey::Name, "Name").sortable().filterable().width(32),
        ColumnSpec::new(ColumnKey::Size, "Size").sortable().width(10),
        ColumnSpec::new(ColumnKey::Type, "Type").sortable().filterable().width(20),
        ColumnSpec::new(ColumnKey::Status, "Status").sortable().filterable().width(10),
        ColumnSpec::new(ColumnKey::UploadedAt, "Uploaded").sortable().width(20),
    ]
}
