use chrono::Utc;
use super::errors::{Result, UploadError};
use super::types::{FileDescriptor, UploadId, UploadRecord, UploadStatus};

impl UploadRecord {
    pub fn new(file: &FileDescriptor) -> Self {
        Self {
            id: UploadId::new(),
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            uploaded_at: Utc::now(),
            remote_key: None,
            status: UploadStatus::Pending,
            progress: 0,
            error: None,
        }
    }

    /// 状态只能 pending -> uploading -> completed/error，或 pending -> error（校验失败）
    pub fn is_valid_transition(from: UploadStatus, to: UploadStatus) -> bool {
        use UploadStatus::*;

        matches!(
            (from, to),
            (Pending, Uploading)
                | (Pending, Error)
                | (Uploading, Uploading)
                | (Uploading, Completed)
                | (Uploading, Error)
        )
    }

    fn transition(&self, to: UploadStatus) -> Result<Self> {
        if !Self::is_valid_transition(self.status, to) {
            return Err(UploadError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        let mut next = self.clone();
        next.status = to;
        Ok(next)
    }

    pub fn start(&self) -> Result<Self> {
        let mut next = self.transition(UploadStatus::Uploading)?;
        next.progress = 0;
        Ok(next)
    }

    /// Progress never goes backwards and stays below 100 until `complete`.
    pub fn advance(&self, percent: u8) -> Result<Self> {
        let mut next = self.transition(UploadStatus::Uploading)?;
        next.progress = percent.min(99).max(self.progress);
        Ok(next)
    }

    /// 拿到上传地址后记录远端 key，传输开始前调用
    pub fn assign_key(&self, remote_key: impl Into<String>) -> Result<Self> {
        let mut next = self.transition(UploadStatus::Uploading)?;
        next.remote_key = Some(remote_key.into());
        Ok(next)
    }

    pub fn complete(&self, remote_key: impl Into<String>) -> Result<Self> {
        let mut next = self.transition(UploadStatus::Completed)?;
        next.progress = 100;
        next.remote_key = Some(remote_key.into());
        Ok(next)
    }

    pub fn fail(&self, message: impl Into<String>) -> Result<Self> {
        let mut next = self.transition(UploadStatus::Error)?;
        next.error = Some(message.into());
        Ok(next)
    }
}
