mod errors;
mod orchestrator;
mod record;
mod traits;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use errors::{Result, UploadError, ValidationError};
pub use orchestrator::UploadOrchestrator;
pub use traits::Transport;
pub use types::{
    Destination,
    DestinationRequest,
    FileDescriptor,
    FileSource,
    HostAction,
    TransferProgress,
    UploadEvent,
    UploadId,
    UploadRecord,
    UploadStatus,
};
pub use validate::validate;
