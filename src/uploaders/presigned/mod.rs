use async_trait::async_trait;
use futures::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::io::ReaderStream;
use tracing::debug;
use crate::config::UploadConfig;
use crate::core::{
    Destination,
    DestinationRequest,
    FileDescriptor,
    FileSource,
    Result,
    TransferProgress,
    Transport,
    UploadError,
};
use crate::progress::ProgressStream;

/// 内存数据按块发送，保证进度能多次汇报
const MEMORY_CHUNK_SIZE: usize = 64 * 1024;

/// 预签名地址上传器
///
/// 先 `POST` 到接口换取 `{uploadUrl, key}`，再把文件 `PUT` 到 `uploadUrl`。
#[derive(Debug, Clone)]
pub struct PresignedUploader {
    client: Client,
    endpoint: String,
}

impl PresignedUploader {
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_client(client, &config.endpoint_url))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    async fn body(file: &FileDescriptor, progress_tx: UnboundedSender<TransferProgress>) -> Result<Body> {
        let total = Some(file.size);

        let body = match &file.source {
            FileSource::Path(path) => {
                let handle = File::open(path).await?;
                let actual = handle.metadata().await?.len();
                if actual != file.size {
                    return Err(UploadError::FileChanged {
                        expected: file.size,
                        actual,
                    });
                }

                // Content-Length 按选择时的大小发送，读取不能超过它
                let stream = ReaderStream::new(handle.take(file.size));
                Body::wrap_stream(ProgressStream::new(stream, total, Some(progress_tx)))
            }
            FileSource::Memory(data) => {
                let mut chunks = Vec::with_capacity(data.len() / MEMORY_CHUNK_SIZE + 1);
                let mut offset = 0;
                while offset < data.len() {
                    let end = (offset + MEMORY_CHUNK_SIZE).min(data.len());
                    chunks.push(Ok::<_, std::io::Error>(data.slice(offset..end)));
                    offset = end;
                }
                Body::wrap_stream(ProgressStream::new(stream::iter(chunks), total, Some(progress_tx)))
            }
        };

        Ok(body)
    }
}

#[async_trait]
impl Transport for PresignedUploader {
    async fn request_destination(&self, request: &DestinationRequest) -> Result<Destination> {
        let response = self.client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Destination { status: status.as_u16() });
        }

        let text = response.text().await?;
        let destination: Destination = serde_json::from_str(&text)
            .map_err(|err| UploadError::malformed(format!("Invalid destination response: {}", err)))?;

        debug!(key = %destination.key, "Received pre-signed destination");
        Ok(destination)
    }

    async fn transfer(
        &self,
        destination: &Destination,
        file: &FileDescriptor,
        progress_tx: UnboundedSender<TransferProgress>,
    ) -> Result<()> {
        let content_type = HeaderValue::from_str(&file.content_type)
            .map_err(|err| UploadError::internal(format!("Invalid content type {:?}: {}", file.content_type, err)))?;
        let body = Self::body(file, progress_tx).await?;

        let response = self.client
            .put(&destination.upload_url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, file.size)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Transfer { status: status.as_u16() });
        }

        Ok(())
    }
}
