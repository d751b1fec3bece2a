use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use super::errors::Result;
use super::types::{Destination, DestinationRequest, FileDescriptor, TransferProgress};

/// 上传传输层 - 申请预签名地址并把文件内容发送过去
#[async_trait]
pub trait Transport: Send + Sync {
    /// 申请上传地址
    async fn request_destination(&self, request: &DestinationRequest) -> Result<Destination>;

    /// 发送文件内容，过程中通过 `progress_tx` 汇报已发送字节数
    async fn transfer(
        &self,
        destination: &Destination,
        file: &FileDescriptor,
        progress_tx: UnboundedSender<TransferProgress>,
    ) -> Result<()>;
}
