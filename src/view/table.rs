use crate::core::{UploadEvent, UploadId, UploadRecord};
use crate::utils::format_cell;
use super::columns::{ColumnKey, ColumnSpec};
use super::projector::{project, toggle_sort, SortSpec};

/// 文件表格的视图状态
///
/// 持有全部记录、过滤文本和排序方式，任一输入变化后重新计算投影。
#[derive(Debug, Clone)]
pub struct TableView {
    columns: Vec<ColumnSpec>,
    records: Vec<UploadRecord>,
    filter_text: String,
    sort: SortSpec,
    rows: Vec<UploadRecord>,
}

impl TableView {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            records: Vec::new(),
            filter_text: String::new(),
            sort: SortSpec::default(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    /// 当前显示的行
    pub fn rows(&self) -> &[UploadRecord] {
        &self.rows
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    fn refresh(&mut self) {
        self.rows = project(&self.records, &self.filter_text, self.sort);
    }

    pub fn set_records(&mut self, records: Vec<UploadRecord>) {
        self.records = records;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter_text: impl Into<String>) {
        self.filter_text = filter_text.into();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.refresh();
    }

    /// Header click. Columns not marked sortable are ignored.
    pub fn toggle_sort(&mut self, key: ColumnKey) -> bool {
        let sortable = self.columns.iter().any(|column| column.key == key && column.sortable);
        if !sortable {
            return false;
        }

        self.sort = toggle_sort(self.sort, key);
        self.refresh();
        true
    }

    /// 新记录追加到末尾，已有记录按 id 替换
    pub fn upsert(&mut self, record: UploadRecord) {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.refresh();
    }

    pub fn remove(&mut self, id: UploadId) -> Option<UploadRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        self.refresh();
        Some(removed)
    }

    /// 根据上传事件更新记录，宿主操作不在这里处理
    pub fn apply(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::Selected { records } => {
                for record in records {
                    match self.records.iter_mut().find(|existing| existing.id == record.id) {
                        Some(existing) => *existing = record.clone(),
                        None => self.records.push(record.clone()),
                    }
                }
                self.refresh();
            }
            UploadEvent::Started { record }
            | UploadEvent::Progress { record }
            | UploadEvent::Completed { record }
            | UploadEvent::Failed { record, .. } => self.upsert(record.clone()),
            UploadEvent::Action(_) => {}
        }
    }

    /// 当前行按列格式化后的文本
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|column| format_cell(record, column.key))
                    .collect()
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self.columns
            .iter()
            .map(|column| column.width.map(usize::from).unwrap_or(column.label.len().max(12)))
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(render_line(self.columns.iter().map(|column| column.label.clone()), &widths));
        for row in self.cells() {
            lines.push(render_line(row.into_iter(), &widths));
        }

        lines.join("\n")
    }
}

fn render_line(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let cell: String = cell.chars().take(*width).collect();
            format!("{:<width$}", cell, width = *width)
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
