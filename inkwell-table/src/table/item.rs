//! TableRow trait, Column descriptors and cell values.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How wide a column is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Fixed width in terminal columns.
    Fixed(u16),
    /// Share of the remaining width, by weight.
    Flex(u16),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex(1)
    }
}

/// A comparable, displayable value extracted from a row for one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Total ordering used by the default comparator.
    ///
    /// Values of different kinds order as `Empty < Bool < number < Text`;
    /// integers and floats compare numerically.
    pub fn compare(&self, other: &Self) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Field accessor: pulls the value a column displays out of a row.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Custom cell renderer: `(value, row, index) -> text`.
pub type CellRenderer<T> = Arc<dyn Fn(&CellValue, &T, usize) -> String + Send + Sync>;

/// Column descriptor.
///
/// Columns are supplied by the caller and never change for the lifetime of
/// a table. The `id` must be unique per table; it is what sort state refers to.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     Column::new("name", "Name").data_key(|u: &User| u.name.clone().into()).sortable(),
///     Column::new("email", "Email").data_key(|u: &User| u.email.clone().into()),
///     Column::new("posts", "Posts").align(Alignment::Right).fixed(6),
/// ];
/// ```
pub struct Column<T> {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text.
    pub label: String,
    /// Whether clicking the header cycles the sort.
    pub sortable: bool,
    /// Horizontal alignment of header and cells.
    pub align: Alignment,
    /// Layout width.
    pub width: ColumnWidth,
    /// Lower bound when the width is flexible.
    pub min_width: Option<u16>,
    /// Sticky columns are laid out before all others.
    pub sticky: bool,
    data_key: Option<Accessor<T>>,
    render: Option<CellRenderer<T>>,
}

impl<T> Column<T> {
    /// Create a new column with the given id and header label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sortable: false,
            align: Alignment::Left,
            width: ColumnWidth::default(),
            min_width: None,
            sticky: false,
            data_key: None,
            render: None,
        }
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Set a fixed width in terminal columns.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set a flexible width with the given weight.
    pub fn flex(mut self, weight: u16) -> Self {
        self.width = ColumnWidth::Flex(weight.max(1));
        self
    }

    /// Set a minimum width for flexible columns.
    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Pin the column to the left edge.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Set the field accessor.
    pub fn data_key<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.data_key = Some(Arc::new(accessor));
        self
    }

    /// Set a custom cell renderer.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellValue, &T, usize) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// The value the accessor pulls out of `row`, or `Empty` without one.
    pub fn value(&self, row: &T) -> CellValue {
        self.data_key
            .as_ref()
            .map(|accessor| accessor(row))
            .unwrap_or_default()
    }

    /// Display text for `row` at `index`.
    ///
    /// A renderer wins over the raw accessor value; with neither the cell is empty.
    pub fn cell_text(&self, row: &T, index: usize) -> String {
        let value = self.value(row);
        match &self.render {
            Some(render) => render(&value, row, index),
            None => value.to_string(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            align: self.align,
            width: self.width,
            min_width: self.min_width,
            sticky: self.sticky,
            data_key: self.data_key.clone(),
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("sticky", &self.sticky)
            .field("data_key", &self.data_key.as_ref().map(|_| "fn"))
            .field("render", &self.render.as_ref().map(|_| "fn"))
            .finish()
    }
}

/// Trait for items that can be displayed as rows in a Table.
///
/// The table never mutates rows. Selection is keyed by [`TableRow::id`], so a
/// selected row stays selected when the data is re-sorted or re-fetched.
pub trait TableRow: Clone {
    /// Stable identifier for this row (a primary key, not a position).
    fn id(&self) -> String;
}
