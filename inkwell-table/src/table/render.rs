//! View model and text layout.
//!
//! [`Table::view`] resolves loading and empty states into a [`TableView`];
//! [`TableView::render_lines`] lays it out as styled text lines. Drawing the
//! lines (colours, cursor) is up to the terminal front end.

use crate::selection::CheckboxState;
use crate::skeleton::{CHECKBOX_WIDTH, SkeletonCell, placeholder};
use crate::sort::SortDirection;
use crate::text::{fit, frame, layout_widths};

use super::item::{Alignment, ColumnWidth, TableRow};
use super::state::TableState;
use super::{Table, TableSize, TableVariant};

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub align: Alignment,
    pub sortable: bool,
    /// Set on the active sort column only.
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    /// Label with the sort indicator appended on the active column.
    pub fn text(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.label, direction.indicator()),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    /// Header checkbox, present when the table is selectable.
    pub checkbox: Option<CheckboxState>,
    pub cells: Vec<HeaderCell>,
}

/// One body row, tagged by what it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRow {
    Data {
        id: String,
        /// Position within the visible rows.
        index: usize,
        /// `None` when the table is not selectable.
        selected: Option<bool>,
        cells: Vec<String>,
    },
    Skeleton(Vec<SkeletonCell>),
    Empty {
        title: String,
        description: Option<String>,
        colspan: usize,
    },
}

/// How a rendered line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Frame,
    Header,
    Rule,
    Row {
        striped: bool,
        hovered: bool,
        selected: bool,
    },
    Skeleton,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub style: LineStyle,
}

impl RenderedLine {
    fn new(text: String, style: LineStyle) -> Self {
        Self { text, style }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    width: ColumnWidth,
    min_width: Option<u16>,
    align: Alignment,
}

/// Everything needed to draw one frame of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: HeaderView,
    pub rows: Vec<BodyRow>,
    pub loading: bool,
    pub selectable: bool,
    pub striped: bool,
    pub hoverable: bool,
    pub clickable_rows: bool,
    pub variant: TableVariant,
    pub size: TableSize,
    pub max_height: Option<usize>,
    pub sticky_header: bool,
    hovered: Option<usize>,
    layout: Vec<ColumnLayout>,
}

impl<T: TableRow> Table<T> {
    /// Build the view for the visible rows.
    ///
    /// While loading, the body is exactly `loading_rows` skeleton rows. With
    /// no rows, it is a single empty-state row spanning every column.
    pub fn view(&self, visible: &[T], state: &TableState) -> TableView {
        let columns = self.layout_columns();

        let checkbox = self.selectable.then(|| {
            if self.loading {
                CheckboxState::Unchecked
            } else {
                let ids: Vec<String> = visible.iter().map(TableRow::id).collect();
                state.selection.header_state(&ids)
            }
        });
        let header = HeaderView {
            checkbox,
            cells: columns
                .iter()
                .map(|c| HeaderCell {
                    column_id: c.id.clone(),
                    label: c.label.clone(),
                    align: c.align,
                    sortable: c.sortable,
                    sort: state.sort.direction_for(&c.id),
                })
                .collect(),
        };

        let rows = if self.loading {
            let mut cells = Vec::with_capacity(self.column_span());
            if self.selectable {
                cells.push(SkeletonCell::Checkbox);
            }
            cells.extend(
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| placeholder(Some(c.width), i)),
            );
            vec![BodyRow::Skeleton(cells); self.loading_rows]
        } else if visible.is_empty() {
            vec![BodyRow::Empty {
                title: self.empty_state.title.clone(),
                description: self.empty_state.description.clone(),
                colspan: self.column_span(),
            }]
        } else {
            visible
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    let id = row.id();
                    BodyRow::Data {
                        selected: self.selectable.then(|| state.selection.is_selected(&id)),
                        id,
                        index,
                        cells: columns.iter().map(|c| c.cell_text(row, index)).collect(),
                    }
                })
                .collect()
        };

        TableView {
            header,
            rows,
            loading: self.loading,
            selectable: self.selectable,
            striped: self.striped,
            hoverable: self.hoverable,
            clickable_rows: self.rows_clickable(),
            variant: self.variant,
            size: self.size,
            max_height: self.max_height,
            sticky_header: self.sticky_header,
            hovered: None,
            layout: columns
                .iter()
                .map(|c| ColumnLayout {
                    width: c.width,
                    min_width: c.min_width,
                    align: c.align,
                })
                .collect(),
        }
    }
}

impl TableView {
    /// Mark the data row at `index` as hovered. Ignored unless hoverable.
    pub fn hover(mut self, index: Option<usize>) -> Self {
        if self.hoverable {
            self.hovered = index;
        }
        self
    }

    /// Whether the body shows data rows.
    pub fn has_data(&self) -> bool {
        matches!(self.rows.first(), Some(BodyRow::Data { .. }))
    }

    /// Largest useful scroll offset for the body.
    pub fn max_scroll(&self) -> usize {
        match self.max_height {
            Some(height) => self.rows.len().saturating_sub(height),
            None => 0,
        }
    }

    /// Lay the view out into lines `width` columns wide, with the body
    /// scrolled down by `scroll` rows.
    ///
    /// Sticky columns come first. With `max_height` only that many body rows
    /// are drawn; the header stays on screen when scrolled only if
    /// `sticky_header` is set.
    pub fn render_lines(&self, width: u16, scroll: usize) -> Vec<RenderedLine> {
        let frame = frame(self.variant, width);
        let inner = if frame.is_some() { width.saturating_sub(2) } else { width };
        let gap = self.size.gap();
        let specs: Vec<_> = self.layout.iter().map(|c| (c.width, c.min_width)).collect();
        let widths = layout_widths(&specs, self.selectable, inner, gap);
        let row_width =
            widths.iter().sum::<u16>() + gap * widths.len().saturating_sub(1) as u16;
        let separator = " ".repeat(gap as usize);

        let scroll = scroll.min(self.max_scroll());
        let end = match self.max_height {
            Some(height) => (scroll + height).min(self.rows.len()),
            None => self.rows.len(),
        };

        let mut lines = Vec::new();
        if scroll == 0 || self.sticky_header {
            let mut cells = Vec::with_capacity(widths.len());
            if let Some(checkbox) = self.header.checkbox {
                cells.push(fit(checkbox.glyph(), CHECKBOX_WIDTH, Alignment::Left));
            }
            let data_widths = &widths[usize::from(self.selectable)..];
            for (cell, w) in self.header.cells.iter().zip(data_widths) {
                cells.push(fit(&cell.text(), *w, cell.align));
            }
            lines.push(RenderedLine::new(cells.join(&separator), LineStyle::Header));
            lines.push(RenderedLine::new(
                "─".repeat(row_width as usize),
                LineStyle::Rule,
            ));
        }

        for row in &self.rows[scroll..end] {
            match row {
                BodyRow::Data {
                    index,
                    selected,
                    cells,
                    ..
                } => {
                    let mut out = Vec::with_capacity(widths.len());
                    if let Some(selected) = selected {
                        out.push(fit(
                            CheckboxState::row_glyph(*selected),
                            CHECKBOX_WIDTH,
                            Alignment::Left,
                        ));
                    }
                    let data_widths = &widths[usize::from(self.selectable)..];
                    for ((text, w), layout) in cells.iter().zip(data_widths).zip(&self.layout) {
                        out.push(fit(text, *w, layout.align));
                    }
                    let style = LineStyle::Row {
                        striped: self.striped && index % 2 == 1,
                        hovered: self.hovered == Some(*index),
                        selected: selected.unwrap_or(false),
                    };
                    lines.push(RenderedLine::new(out.join(&separator), style));
                }
                BodyRow::Skeleton(cells) => {
                    let text = cells
                        .iter()
                        .zip(&widths)
                        .map(|(cell, w)| cell.draw(*w))
                        .collect::<Vec<_>>()
                        .join(&separator);
                    lines.push(RenderedLine::new(text, LineStyle::Skeleton));
                }
                BodyRow::Empty {
                    title, description, ..
                } => {
                    lines.push(RenderedLine::new(
                        fit(title, row_width, Alignment::Center),
                        LineStyle::Empty,
                    ));
                    if let Some(description) = description {
                        lines.push(RenderedLine::new(
                            fit(description, row_width, Alignment::Center),
                            LineStyle::Empty,
                        ));
                    }
                }
            }
        }

        match frame {
            Some(frame) => {
                let mut framed = Vec::with_capacity(lines.len() + 2);
                framed.push(RenderedLine::new(frame.top().to_string(), LineStyle::Frame));
                framed.extend(
                    lines
                        .into_iter()
                        .map(|line| RenderedLine::new(frame.side(&line.text), line.style)),
                );
                framed.push(RenderedLine::new(
                    frame.bottom().to_string(),
                    LineStyle::Frame,
                ));
                framed
            }
            None => lines,
        }
    }

    /// [`render_lines`](Self::render_lines) without styles, trailing spaces
    /// trimmed.
    pub fn render_text(&self, width: u16, scroll: usize) -> Vec<String> {
        self.render_lines(width, scroll)
            .into_iter()
            .map(|line| line.text.trim_end().to_string())
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortState;
    use crate::table::{CellValue, Column, EmptyState, TableEvent};
    use crate::text::display_width;

    #[derive(Clone, Debug)]
    struct Post {
        id: u32,
        title: &'static str,
        pinned: bool,
    }

    impl TableRow for Post {
        fn id(&self) -> String {
            format!("post-{}", self.id)
        }
    }

    fn columns() -> Vec<Column<Post>> {
        vec![
            Column::new("title", "Title")
                .data_key(|p: &Post| CellValue::from(p.title))
                .sortable(),
            Column::new("pinned", "Pin")
                .data_key(|p: &Post| CellValue::from(p.pinned))
                .fixed(4)
                .sticky(),
        ]
    }

    fn posts() -> Vec<Post> {
        vec![
            Post { id: 1, title: "Hello", pinned: true },
            Post { id: 2, title: "World", pinned: false },
            Post { id: 3, title: "Again", pinned: false },
        ]
    }

    #[test]
    fn loading_renders_exactly_loading_rows_skeletons() {
        let table = Table::new(columns()).selectable().loading(true).loading_rows(3);
        let view = table.view(&posts(), &TableState::default());
        assert_eq!(view.rows.len(), 3);
        for row in &view.rows {
            match row {
                BodyRow::Skeleton(cells) => {
                    assert_eq!(cells.len(), 3);
                    assert_eq!(cells[0], SkeletonCell::Checkbox);
                }
                other => panic!("expected skeleton, got {:?}", other),
            }
        }
    }

    #[test]
    fn empty_rows_show_single_spanning_row() {
        let table = Table::new(columns()).selectable();
        let view = table.view(&[], &TableState::default());
        assert_eq!(
            view.rows,
            vec![BodyRow::Empty {
                title: "No data available".into(),
                description: Some("There are no records to display at the moment.".into()),
                colspan: 3,
            }]
        );

        let table = Table::new(columns()).empty_state(EmptyState::new("Nothing yet"));
        let view = table.view(&[], &TableState::default());
        let text = view.render_text(40, 0);
        assert_eq!(text.len(), 3);
        assert_eq!(text[2].trim(), "Nothing yet");
    }

    #[test]
    fn sticky_columns_come_first_with_sort_indicator() {
        let table = Table::new(columns());
        let state = TableState {
            sort: SortState::by("title", SortDirection::Descending),
            ..TableState::default()
        };
        let view = table.view(&posts(), &state);
        let ids: Vec<_> = view.header.cells.iter().map(|c| c.column_id.as_str()).collect();
        assert_eq!(ids, vec!["pinned", "title"]);
        assert_eq!(view.header.cells[1].text(), "Title ▼");
        assert_eq!(view.header.cells[0].sort, None);

        let text = view.render_text(20, 0);
        assert_eq!(text[0], "Pin   Title ▼");
        assert_eq!(text[2], "yes   Hello");
    }

    #[test]
    fn selection_marks_rows_and_header() {
        let table = Table::new(columns()).selectable();
        let mut state = TableState::default();
        state.apply(&TableEvent::<Post>::SelectionChanged(vec!["post-2".into()]));
        let view = table.view(&posts(), &state);
        assert_eq!(view.header.checkbox, Some(CheckboxState::Indeterminate));
        match &view.rows[1] {
            BodyRow::Data { id, selected, .. } => {
                assert_eq!(id, "post-2");
                assert_eq!(*selected, Some(true));
            }
            other => panic!("expected data row, got {:?}", other),
        }
        let lines = view.render_lines(30, 0);
        assert!(lines[3].text.starts_with("[x]"));
        assert_eq!(
            lines[3].style,
            LineStyle::Row {
                striped: false,
                hovered: false,
                selected: true
            }
        );
    }

    #[test]
    fn max_height_scrolls_body_and_keeps_sticky_header() {
        let table = Table::new(columns()).max_height(2).sticky_header();
        let view = table.view(&posts(), &TableState::default());
        assert_eq!(view.max_scroll(), 1);

        let text = view.render_text(20, 5);
        assert_eq!(text.len(), 4);
        assert!(text[0].starts_with("Pin"));
        assert_eq!(text[2], "no    World");

        let table = Table::new(columns()).max_height(2);
        let text = table.view(&posts(), &TableState::default()).render_text(20, 1);
        assert_eq!(text, vec!["no    World", "no    Again"]);
    }

    #[test]
    fn hover_and_stripes_follow_flags() {
        let table = Table::new(columns()).striped().hoverable(false);
        let view = table.view(&posts(), &TableState::default()).hover(Some(0));
        let styles: Vec<_> = view
            .render_lines(20, 0)
            .into_iter()
            .skip(2)
            .map(|l| l.style)
            .collect();
        assert_eq!(
            styles[1],
            LineStyle::Row {
                striped: true,
                hovered: false,
                selected: false
            }
        );
        assert_eq!(
            styles[0],
            LineStyle::Row {
                striped: false,
                hovered: false,
                selected: false
            }
        );
    }

    #[test]
    fn outlined_variant_frames_every_line() {
        let table = Table::new(columns()).variant(TableVariant::Outlined);
        let lines = table.view(&posts(), &TableState::default()).render_lines(20, 0);
        assert_eq!(lines.len(), 2 + 3 + 2);
        assert_eq!(lines[0].style, LineStyle::Frame);
        assert!(lines[1].text.starts_with("│Pin"));
        assert!(lines.iter().all(|l| display_width(&l.text) == 20));
    }
}
