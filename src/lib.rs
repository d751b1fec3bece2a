pub mod config;
pub mod core;
pub mod progress;
pub mod uploaders;
pub mod utils;
pub mod view;

// 重新导出核心类型
pub use crate::core::{
    Destination,
    DestinationRequest,
    FileDescriptor,
    FileSource,
    HostAction,
    Result,
    TransferProgress,
    Transport,
    UploadError,
    UploadEvent,
    UploadId,
    UploadOrchestrator,
    UploadRecord,
    UploadStatus,
    ValidationError,
};

pub use config::{Config, UploadConfig};
pub use uploaders::PresignedUploader;
pub use view::{project, toggle_sort, ColumnKey, ColumnSpec, SortDirection, SortSpec, TableView};
