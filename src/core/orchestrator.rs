use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};
use crate::config::UploadConfig;
use super::errors::{Result, UploadError, ValidationError};
use super::traits::Transport;
use super::types::{DestinationRequest, FileDescriptor, HostAction, TransferProgress, UploadEvent, UploadRecord, UploadStatus};
use super::validate::validate;

/// 上传编排器
///
/// 校验选择的文件、依次上传，并把每条记录的状态变化以 [`UploadEvent`] 广播出去。
#[derive(Clone)]
pub struct UploadOrchestrator {
    transport: Arc<dyn Transport>,
    config: UploadConfig,
    event_tx: broadcast::Sender<UploadEvent>,
}

impl UploadOrchestrator {
    pub fn new(transport: Arc<dyn Transport>, config: UploadConfig) -> Self {
        // 最大缓存 256 个事件
        let (event_tx, _) = broadcast::channel(256);

        Self {
            transport,
            config,
            event_tx,
        }
    }

    /// 订阅事件
    ///
    /// 接收速度跟不上时会丢失事件（lagged error）
    pub fn subscribe_events(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: UploadEvent) {
        // 没有订阅者时发送失败，忽略
        let _ = self.event_tx.send(event);
    }

    /// 转发宿主界面的操作
    pub fn notify(&self, action: HostAction) {
        self.emit(UploadEvent::Action(action));
    }

    pub fn validate(&self, file: &FileDescriptor) -> Option<ValidationError> {
        validate(file, &self.config)
    }

    pub fn create_record(&self, file: &FileDescriptor) -> UploadRecord {
        UploadRecord::new(file)
    }

    /// 处理一次文件选择，返回每个文件最终的记录（顺序与输入一致）
    pub async fn process_selection(&self, files: Vec<FileDescriptor>) -> Result<Vec<UploadRecord>> {
        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            let record = self.create_record(file);
            let record = match self.validate(file) {
                Some(error) => {
                    warn!(upload_id = %record.id, file = %file.name, %error, "File rejected");
                    record.fail(UploadError::from(error).to_string())?
                }
                None => record,
            };
            records.push(record);
        }

        self.emit(UploadEvent::Selected {
            records: records.clone(),
        });
        tokio::task::yield_now().await;

        let mut results = Vec::with_capacity(records.len());
        for (file, record) in files.iter().zip(records) {
            if record.status == UploadStatus::Pending {
                results.push(self.upload_one(file, record).await?);
            } else {
                results.push(record);
            }
        }

        Ok(results)
    }

    /// 上传单个文件，失败记录在返回的记录上，不会返回 Err
    ///
    /// 只有在记录状态不是 pending 时返回 `InvalidTransition`。
    pub async fn upload_one(&self, file: &FileDescriptor, record: UploadRecord) -> Result<UploadRecord> {
        let span = info_span!("upload", upload_id = %record.id, file = %file.name);
        self.upload_record(file, record).instrument(span).await
    }

    async fn upload_record(&self, file: &FileDescriptor, record: UploadRecord) -> Result<UploadRecord> {
        let record = record.start()?;
        info!(size = file.size, "Upload started");
        self.emit(UploadEvent::Started { record: record.clone() });

        match self.run_transfer(file, record).await {
            Ok((record, key)) => {
                let record = record.complete(key)?;
                info!(key = ?record.remote_key, "Upload completed");
                self.emit(UploadEvent::Completed { record: record.clone() });
                Ok(record)
            }
            Err((record, error)) => {
                let message = error.to_string();
                warn!(error = %message, "Upload failed");
                let record = record.fail(message.clone())?;
                self.emit(UploadEvent::Failed {
                    record: record.clone(),
                    error: message,
                });
                Ok(record)
            }
        }
    }

    /// 申请地址并发送文件，同时消费进度。失败时返回最后的记录和错误
    async fn run_transfer(
        &self,
        file: &FileDescriptor,
        mut record: UploadRecord,
    ) -> std::result::Result<(UploadRecord, String), (UploadRecord, UploadError)> {
        let request = DestinationRequest::from(file);
        let destination = match self.transport.request_destination(&request).await {
            Ok(destination) => destination,
            Err(err) => return Err((record, err)),
        };
        debug!(upload_url = %destination.upload_url, key = %destination.key, "Destination acquired");

        record = match record.assign_key(&destination.key) {
            Ok(next) => next,
            Err(err) => return Err((record, err)),
        };

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let transfer = self.transport.transfer(&destination, file, progress_tx);
        tokio::pin!(transfer);

        let result = loop {
            tokio::select! {
                biased;

                Some(progress) = progress_rx.recv() => {
                    record = self.apply_progress(record, progress);
                }
                result = &mut transfer => break result,
            }
        };

        // 传输结束后可能还有未处理的进度
        while let Ok(progress) = progress_rx.try_recv() {
            record = self.apply_progress(record, progress);
        }

        match result {
            Ok(()) => Ok((record, destination.key.clone())),
            Err(err) => Err((record, err)),
        }
    }

    fn apply_progress(&self, record: UploadRecord, progress: TransferProgress) -> UploadRecord {
        let Some(percent) = progress.percentage() else {
            return record;
        };

        match record.advance(percent) {
            Ok(next) => {
                if next.progress != record.progress {
                    debug!(progress = next.progress, sent = progress.sent, "Upload progress");
                    self.emit(UploadEvent::Progress { record: next.clone() });
                }
                next
            }
            Err(_) => record,
        }
    }
}
