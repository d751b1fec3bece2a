use std::collections::HashSet;
use super::*;

fn record() -> UploadRecord {
    UploadRecord::new(&FileDescriptor::from_bytes("a.png", "image/png", vec![1u8; 16]))
}

#[test]
fn test_upload_state_transition() {
    use UploadStatus::*;

    // valid
    assert!(UploadRecord::is_valid_transition(Pending, Uploading));
    assert!(UploadRecord::is_valid_transition(Pending, Error));
    assert!(UploadRecord::is_valid_transition(Uploading, Uploading));
    assert!(UploadRecord::is_valid_transition(Uploading, Completed));
    assert!(UploadRecord::is_valid_transition(Uploading, Error));

    // invalid
    assert!(!UploadRecord::is_valid_transition(Pending, Completed));
    assert!(!UploadRecord::is_valid_transition(Completed, Uploading));
    assert!(!UploadRecord::is_valid_transition(Error, Uploading));
    assert!(!UploadRecord::is_valid_transition(Error, Pending));
    assert!(!UploadRecord::is_valid_transition(Completed, Error));
}

#[test]
fn test_new_record() {
    let record = record();

    assert_eq!(record.name, "a.png");
    assert_eq!(record.size, 16);
    assert_eq!(record.content_type, "image/png");
    assert_eq!(record.status, UploadStatus::Pending);
    assert_eq!(record.progress, 0);
    assert_eq!(record.remote_key, None);
    assert_eq!(record.error, None);
}

#[test]
fn test_upload_id_generation() {
    let ids: HashSet<UploadId> = (0..10_000).map(|_| record().id).collect();
    assert_eq!(ids.len(), 10_000);

    let id = UploadId::new();
    assert_eq!(id, id);
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_lifecycle() {
    let pending = record();
    let uploading = pending.start().unwrap();
    assert_eq!(uploading.status, UploadStatus::Uploading);
    assert_eq!(pending.status, UploadStatus::Pending);

    let uploading = uploading.assign_key("uploads/a.png").unwrap();
    assert_eq!(uploading.status, UploadStatus::Uploading);
    assert_eq!(uploading.remote_key.as_deref(), Some("uploads/a.png"));

    let halfway = uploading.advance(50).unwrap();
    assert_eq!(halfway.remote_key.as_deref(), Some("uploads/a.png"));
    assert_eq!(halfway.progress, 50);

    // never goes backwards
    assert_eq!(halfway.advance(30).unwrap().progress, 50);
    // 100 is reserved for completion
    assert_eq!(halfway.advance(100).unwrap().progress, 99);

    let completed = halfway.complete("uploads/a.png").unwrap();
    assert_eq!(completed.status, UploadStatus::Completed);
    assert_eq!(completed.progress, 100);
    assert_eq!(completed.remote_key.as_deref(), Some("uploads/a.png"));
    assert_eq!(completed.uploaded_at, pending.uploaded_at);
    assert_eq!(completed.id, pending.id);
}

#[test]
fn test_failure_is_terminal() {
    let failed = record().start().unwrap().fail("boom").unwrap();
    assert_eq!(failed.status, UploadStatus::Error);
    assert_eq!(failed.error.as_deref(), Some("boom"));

    assert!(matches!(
        failed.start(),
        Err(UploadError::InvalidTransition { from: UploadStatus::Error, to: UploadStatus::Uploading })
    ));
    assert!(failed.complete("key").is_err());
    assert!(failed.advance(10).is_err());
}

#[test]
fn test_cannot_complete_without_starting() {
    assert!(record().complete("key").is_err());
    assert!(record().assign_key("key").is_err());
    assert!(record().advance(10).is_err());
}

#[test]
fn test_transfer_percentage() {
    let progress = |sent, total| TransferProgress { sent, total };

    assert_eq!(progress(0, Some(100)).percentage(), Some(0));
    assert_eq!(progress(1, Some(3)).percentage(), Some(33));
    assert_eq!(progress(2, Some(3)).percentage(), Some(67));
    assert_eq!(progress(100, Some(100)).percentage(), Some(100));
    assert_eq!(progress(10, None).percentage(), None);
    assert_eq!(progress(10, Some(0)).percentage(), None);
}

#[test]
fn test_destination_wire_format() {
    let file = FileDescriptor::from_bytes("report.pdf", "application/pdf", vec![0u8; 42]);
    let json = serde_json::to_value(DestinationRequest::from(&file)).unwrap();
    assert_eq!(json, serde_json::json!({
        "fileName": "report.pdf",
        "fileType": "application/pdf",
        "fileSize": 42,
    }));

    let destination: Destination = serde_json::from_str(
        r#"{"uploadUrl": "https://bucket.example.com/x?sig=1", "key": "x"}"#
    ).unwrap();
    assert_eq!(destination.key, "x");
    assert_eq!(destination.upload_url, "https://bucket.example.com/x?sig=1");
}
