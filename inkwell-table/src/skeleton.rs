//! Skeleton placeholders shown while data is pending.

use crate::table::{ColumnWidth, TableSize, TableVariant};
use crate::text::{fit, frame, layout_widths};

/// Skeleton widths cycled through for flexible columns, in percent.
const WIDTH_VARIATIONS: [u8; 5] = [100, 80, 90, 70, 85];

/// Width of the checkbox column, in terminal columns.
pub(crate) const CHECKBOX_WIDTH: u16 = 3;

/// One placeholder cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonCell {
    /// Square placeholder standing in for a checkbox.
    Checkbox,
    /// Text bar covering `percent` of the cell width.
    Text { percent: u8 },
    /// Text bar with a fixed length.
    Bar { len: u16 },
}

impl SkeletonCell {
    /// Draw the placeholder into a cell of `width` columns.
    pub fn draw(self, width: u16) -> String {
        let len = match self {
            SkeletonCell::Checkbox => return fit("[░]", width, Default::default()),
            SkeletonCell::Text { percent } => {
                (u32::from(width) * u32::from(percent) / 100).max(1) as u16
            }
            SkeletonCell::Bar { len } => len.min(width),
        };
        fit(&"░".repeat(len as usize), width, Default::default())
    }
}

/// Placeholder for a column: fixed widths get a bar at 70% of the width
/// (at least 3), flexible ones cycle through the width variations.
pub(crate) fn placeholder(width: Option<ColumnWidth>, index: usize) -> SkeletonCell {
    match width {
        Some(ColumnWidth::Fixed(width)) => SkeletonCell::Bar {
            len: (u32::from(width) * 7 / 10).max(3) as u16,
        },
        _ => SkeletonCell::Text {
            percent: WIDTH_VARIATIONS[index % WIDTH_VARIATIONS.len()],
        },
    }
}

/// Stand-alone skeleton table, used while a whole table is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSkeleton {
    pub columns: usize,
    pub rows: usize,
    pub show_header: bool,
    pub show_checkbox: bool,
    pub variant: TableVariant,
    pub size: TableSize,
    pub column_widths: Vec<ColumnWidth>,
}

impl Default for TableSkeleton {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 5,
            show_header: true,
            show_checkbox: false,
            variant: TableVariant::Standard,
            size: TableSize::Medium,
            column_widths: Vec::new(),
        }
    }
}

impl TableSkeleton {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Header and checkbox column, for selectable data tables.
    pub fn data_table(columns: usize, rows: usize) -> Self {
        Self {
            show_header: true,
            show_checkbox: true,
            ..Self::new(columns, rows)
        }
    }

    /// No checkbox column.
    pub fn simple(columns: usize, rows: usize) -> Self {
        Self {
            show_checkbox: false,
            ..Self::new(columns, rows)
        }
    }

    /// Small, three rows.
    pub fn compact(columns: usize) -> Self {
        Self {
            size: TableSize::Small,
            ..Self::new(columns, 3)
        }
    }

    pub fn with_column_widths(mut self, widths: Vec<ColumnWidth>) -> Self {
        self.column_widths = widths;
        self
    }

    pub fn with_variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Total number of cells per row, checkbox included.
    pub fn total_columns(&self) -> usize {
        self.columns + usize::from(self.show_checkbox)
    }

    /// Placeholder for data column `index`.
    pub fn cell(&self, index: usize) -> SkeletonCell {
        placeholder(self.column_widths.get(index).copied(), index)
    }

    /// Cells of one body row.
    pub fn row_cells(&self) -> Vec<SkeletonCell> {
        let mut cells = Vec::with_capacity(self.total_columns());
        if self.show_checkbox {
            cells.push(SkeletonCell::Checkbox);
        }
        cells.extend((0..self.columns).map(|i| self.cell(i)));
        cells
    }

    /// Render to text lines of `width` columns.
    pub fn render_lines(&self, width: u16) -> Vec<String> {
        let gap = self.size.gap();
        let widths = self.layout(width, gap);
        let draw_row = || -> String {
            self.row_cells()
                .iter()
                .zip(&widths)
                .map(|(cell, w)| cell.draw(*w))
                .collect::<Vec<_>>()
                .join(&" ".repeat(gap as usize))
        };

        let mut lines = Vec::new();
        if self.show_header {
            lines.push(draw_row());
            let rule = widths.iter().sum::<u16>() + gap * widths.len().saturating_sub(1) as u16;
            lines.push("─".repeat(rule as usize));
        }
        for _ in 0..self.rows {
            lines.push(draw_row());
        }
        match frame(self.variant, width) {
            Some(frame) => frame.wrap(lines),
            None => lines,
        }
    }

    fn layout(&self, width: u16, gap: u16) -> Vec<u16> {
        let frame = if self.variant.is_framed() { 2 } else { 0 };
        let specs: Vec<_> = (0..self.columns)
            .map(|i| (self.column_widths.get(i).copied().unwrap_or_default(), None))
            .collect();
        layout_widths(&specs, self.show_checkbox, width.saturating_sub(frame), gap)
    }
}
