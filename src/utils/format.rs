use chrono::{DateTime, Local, Utc};
use crate::core::UploadRecord;
use crate::view::{field_value, ColumnKey, FieldValue};

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// 格式化字节数
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// 格式化时间为本地时间
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_cell(record: &UploadRecord, key: ColumnKey) -> String {
    match key {
        ColumnKey::Size => format_bytes(record.size),
        ColumnKey::Progress => format!("{}%", record.progress),
        _ => match field_value(record, key) {
            FieldValue::Timestamp(at) => format_timestamp(&at),
            other => other.as_text(),
        },
    }
}
