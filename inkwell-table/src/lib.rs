//! Data table contract for terminal front ends.
//!
//! Column descriptors, a three-state sort engine, ID-keyed selection,
//! pagination, loading and empty-state substitution, and a width-aware text
//! layout. The crate holds no interaction state of its own; see [`table`].

pub mod pagination;
pub mod selection;
pub mod skeleton;
pub mod sort;
pub mod table;
pub mod text;

pub mod prelude {
    pub use crate::pagination::{DEFAULT_ROWS_PER_PAGE_OPTIONS, Pagination};
    pub use crate::selection::{CheckboxState, Selection};
    pub use crate::skeleton::{SkeletonCell, TableSkeleton};
    pub use crate::sort::{SortDirection, SortState, next_sort, sort_rows, sort_rows_by};
    pub use crate::table::{
        Alignment, BodyRow, CellValue, Column, ColumnWidth, EmptyState, LineStyle, RenderedLine,
        Table, TableAction, TableEvent, TableHandlers, TableRow, TableSize, TableState, TableVariant,
        TableView,
    };
}
