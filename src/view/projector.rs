use std::cmp::Ordering;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::UploadRecord;
use super::columns::ColumnKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub key: ColumnKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: ColumnKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(ColumnKey::UploadedAt, SortDirection::Desc)
    }
}

/// 排序用的字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(u64),
    Timestamp(DateTime<Utc>),
    Empty,
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Timestamp(at) => at.to_rfc3339(),
            FieldValue::Empty => String::new(),
        }
    }
}

pub fn field_value(record: &UploadRecord, key: ColumnKey) -> FieldValue {
    match key {
        ColumnKey::Id => FieldValue::Text(record.id.to_string()),
        ColumnKey::Name => FieldValue::Text(record.name.clone()),
        ColumnKey::Size => FieldValue::Number(record.size),
        ColumnKey::Type => FieldValue::Text(record.content_type.clone()),
        ColumnKey::Status => FieldValue::Text(record.status.to_string()),
        ColumnKey::Progress => FieldValue::Number(record.progress as u64),
        ColumnKey::UploadedAt => FieldValue::Timestamp(record.uploaded_at),
        ColumnKey::RemoteKey => record.remote_key.clone().map_or(FieldValue::Empty, FieldValue::Text),
        ColumnKey::Error => record.error.clone().map_or(FieldValue::Empty, FieldValue::Text),
    }
}

pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    match (a, b) {
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
        (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
        _ => locale_compare(&a.as_text(), &b.as_text()),
    }
}

/// 近似 locale 排序：先忽略大小写比较，相同时小写排在大写前面
///
/// 不处理重音和标点权重，按码点比较，例如 `"é"` 会排在 `"f"` 之后。
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if primary != Ordering::Equal {
        return primary;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
    }

    a.len().cmp(&b.len())
}

pub fn matches_filter(record: &UploadRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.content_type.to_lowercase().contains(needle)
        || record.status.as_str().contains(needle)
}

/// 过滤并排序，返回新的序列，不修改输入
pub fn project(records: &[UploadRecord], filter_text: &str, sort: SortSpec) -> Vec<UploadRecord> {
    let needle = filter_text.to_lowercase();
    let mut rows: Vec<UploadRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || matches_filter(record, &needle))
        .cloned()
        .collect();

    // sort_by 是稳定排序
    rows.sort_by(|a, b| {
        let ordering = compare_values(&field_value(a, sort.key), &field_value(b, sort.key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    rows
}

/// 同一列再次点击切换方向，换列时重置为升序
pub fn toggle_sort(current: SortSpec, requested: ColumnKey) -> SortSpec {
    if current.key == requested {
        SortSpec::new(requested, current.direction.flip())
    } else {
        SortSpec::new(requested, SortDirection::Asc)
    }
}
