mod columns;
mod projector;
mod table;

pub use columns::{default_columns, ColumnKey, ColumnSpec};
pub use projector::{
    compare_values,
    field_value,
    locale_compare,
    project,
    toggle_sort,
    FieldValue,
    SortDirection,
    SortSpec,
};
pub use table::TableView;
