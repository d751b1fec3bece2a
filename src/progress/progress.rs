use std::pin::Pin;
use std::task::{Context, Poll};
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use tokio::sync::mpsc;
use crate::core::TransferProgress;

pin_project! {
    /// 包装上传内容的流，每读出一块就汇报一次累计发送的字节数
    pub struct ProgressStream<S> {
        #[pin]
        inner: S,
        sent: u64,
        total: Option<u64>,
        progress_tx: Option<mpsc::UnboundedSender<TransferProgress>>,
    }
}

impl<S> ProgressStream<S> {
    pub fn new(inner: S, total: Option<u64>, progress_tx: Option<mpsc::UnboundedSender<TransferProgress>>) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            progress_tx,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl<S> Stream for ProgressStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>>,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if !chunk.is_empty() {
                    *this.sent += chunk.len() as u64;
                    if let Some(tx) = this.progress_tx.as_ref() {
                        let _ = tx.send(TransferProgress {
                            sent: *this.sent,
                            total: *this.total,
                        });
                    }
                }

                Poll::Ready(Some(Ok(chunk)))
            }
            other => other,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_reports_cumulative_bytes() {
        let chunks = vec![
            Ok(Bytes::from_static(b"hello")),
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b" world")),
        ];
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut stream = ProgressStream::new(futures::stream::iter(chunks), Some(11), Some(tx));

        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"hello world");
        assert_eq!(stream.sent(), 11);
        drop(stream);

        let mut reports = Vec::new();
        while let Some(progress) = rx.recv().await {
            reports.push(progress);
        }
        assert_eq!(reports, vec![
            TransferProgress { sent: 5, total: Some(11) },
            TransferProgress { sent: 11, total: Some(11) },
        ]);
    }

    #[tokio::test]
    async fn test_without_listener() {
        let chunks = vec![Ok(Bytes::from_static(b"abc"))];
        let stream = ProgressStream::new(futures::stream::iter(chunks), None, None);
        let collected: Vec<_> = stream.collect().await;
        assert_eq!(collected.len(), 1);
    }
}
