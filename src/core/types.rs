use std::path::{Path, PathBuf};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use super::errors::Result;

/// 上传记录唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UploadId(pub Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 上传状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// 等待上传
    Pending,
    /// 上传中
    Uploading,
    /// 已完成
    Completed,
    /// 失败
    Error,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文件内容来源
#[derive(Debug, Clone)]
pub enum FileSource {
    /// 磁盘文件，上传时以流的方式读取
    Path(PathBuf),
    /// 内存中的数据
    Memory(Bytes),
}

/// 待上传的文件
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    /// 文件大小（字节）
    pub size: u64,
    /// MIME 类型
    pub content_type: String,
    pub source: FileSource,
}

impl FileDescriptor {
    pub fn from_bytes(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            source: FileSource::Memory(data),
        }
    }

    /// Reads size from the file system and guesses the MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            content_type,
            source: FileSource::Path(path.to_path_buf()),
        })
    }
}

/// 单个文件的上传记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: UploadId,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    /// 创建时间，创建后不再变化
    pub uploaded_at: DateTime<Utc>,
    /// 远端存储分配的 key
    pub remote_key: Option<String>,
    pub status: UploadStatus,
    /// 0-100
    pub progress: u8,
    pub error: Option<String>,
}

/// 传输进度，`total` 未知时无法计算百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub sent: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    pub fn percentage(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => {
                let percent = (self.sent as f64 / total as f64 * 100.0).round();
                Some(percent.clamp(0.0, 100.0) as u8)
            }
            _ => None,
        }
    }
}

/// 申请上传地址的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationRequest {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
}

impl From<&FileDescriptor> for DestinationRequest {
    fn from(file: &FileDescriptor) -> Self {
        Self {
            file_name: file.name.clone(),
            file_type: file.content_type.clone(),
            file_size: file.size,
        }
    }
}

/// 预签名上传地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub upload_url: String,
    pub key: String,
}

/// 宿主界面发起的操作，原样转发
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Delete(UploadId),
    Download(UploadId),
    SubmitText(String),
}

/// 上传事件
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// 一次选择的全部记录，在任何上传开始前发送
    Selected {
        records: Vec<UploadRecord>,
    },
    Started {
        record: UploadRecord,
    },
    /// 只在整数百分比变化时发送，同一百分比的多次进度回调合并为一次
    Progress {
        record: UploadRecord,
    },
    Completed {
        record: UploadRecord,
    },
    Failed {
        record: UploadRecord,
        error: String,
    },
    Action(HostAction),
}

impl UploadEvent {
    pub fn upload_id(&self) -> Option<UploadId> {
        match self {
            UploadEvent::Started { record }
            | UploadEvent::Progress { record }
            | UploadEvent::Completed { record }
            | UploadEvent::Failed { record, .. } => Some(record.id),
            UploadEvent::Selected { .. } | UploadEvent::Action(_) => None,
        }
    }
}

// 静态断言确保类型是 Send的
const _: () = {
    fn assert_send<T: Send>() {}
    fn assert_types() {
        assert_send::<UploadRecord>();
        assert_send::<UploadEvent>();
        assert_send::<FileDescriptor>();
    }
};
