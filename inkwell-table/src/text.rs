//! Width-aware text helpers shared by the renderers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::skeleton::CHECKBOX_WIDTH;
use crate::table::{Alignment, ColumnWidth, TableVariant};

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate `text` to at most `width` columns, ending with `…` when cut.
pub fn truncate(text: &str, width: u16) -> String {
    let width = width as usize;
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate or pad `text` so it occupies exactly `width` columns.
pub fn fit(text: &str, width: u16, align: Alignment) -> String {
    let text = truncate(text, width);
    let pad = (width as usize).saturating_sub(display_width(&text));
    let (left, right) = match align {
        Alignment::Left => (0, pad),
        Alignment::Right => (pad, 0),
        Alignment::Center => (pad / 2, pad - pad / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Resolve column widths for `available` terminal columns.
///
/// Fixed columns keep their width. Flexible columns split what is left by
/// weight, never going below their minimum (or 1). A leading checkbox column
/// is added when `checkbox` is set.
pub(crate) fn layout_widths(
    columns: &[(ColumnWidth, Option<u16>)],
    checkbox: bool,
    available: u16,
    gap: u16,
) -> Vec<u16> {
    let cells = columns.len() + usize::from(checkbox);
    let gaps = gap.saturating_mul(cells.saturating_sub(1) as u16);
    let mut remaining = available.saturating_sub(gaps);
    let mut widths = Vec::with_capacity(cells);
    if checkbox {
        widths.push(CHECKBOX_WIDTH);
        remaining = remaining.saturating_sub(CHECKBOX_WIDTH);
    }

    let fixed: u16 = columns
        .iter()
        .filter_map(|(width, _)| match width {
            ColumnWidth::Fixed(w) => Some(*w),
            ColumnWidth::Flex(_) => None,
        })
        .sum();
    let weights: u32 = columns
        .iter()
        .map(|(width, _)| match width {
            ColumnWidth::Flex(weight) => u32::from(*weight),
            ColumnWidth::Fixed(_) => 0,
        })
        .sum();
    let flexible = u32::from(remaining.saturating_sub(fixed));

    for (width, min_width) in columns {
        widths.push(match width {
            ColumnWidth::Fixed(w) => *w,
            ColumnWidth::Flex(weight) => {
                let share = (flexible * u32::from(*weight))
                    .checked_div(weights)
                    .unwrap_or(0) as u16;
                share.max(min_width.unwrap_or(1)).max(1)
            }
        });
    }
    widths
}

/// Box drawn around framed table variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    top: String,
    bottom: String,
    side: char,
    inner: u16,
}

impl Frame {
    pub(crate) fn top(&self) -> &str {
        &self.top
    }

    pub(crate) fn bottom(&self) -> &str {
        &self.bottom
    }

    /// One body line between the side borders.
    pub(crate) fn side(&self, line: &str) -> String {
        format!(
            "{}{}{}",
            self.side,
            fit(line, self.inner, Alignment::Left),
            self.side
        )
    }

    /// Surround `lines` with the frame, padding each to the inner width.
    pub(crate) fn wrap(&self, lines: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len() + 2);
        out.push(self.top.clone());
        out.extend(lines.iter().map(|line| self.side(line)));
        out.push(self.bottom.clone());
        out
    }
}

/// Frame for `variant` at total `width`, or `None` for unframed variants.
pub(crate) fn frame(variant: TableVariant, width: u16) -> Option<Frame> {
    let (tl, tr, bl, br, h, v) = match variant {
        TableVariant::Standard => return None,
        TableVariant::Outlined => ('┌', '┐', '└', '┘', '─', '│'),
        TableVariant::Elevated => ('┏', '┓', '┗', '┛', '━', '┃'),
    };
    let inner = width.saturating_sub(2);
    let rule = h.to_string().repeat(inner as usize);
    Some(Frame {
        top: format!("{}{}{}", tl, rule, tr),
        bottom: format!("{}{}{}", bl, rule, br),
        side: v,
        inner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_by_alignment() {
        assert_eq!(fit("ab", 5, Alignment::Left), "ab   ");
        assert_eq!(fit("ab", 5, Alignment::Right), "   ab");
        assert_eq!(fit("ab", 5, Alignment::Center), " ab  ");
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("abcdefgh", 5, Alignment::Left), "abcd…");
        assert_eq!(fit("abc", 0, Alignment::Left), "");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(fit("日本語", 5, Alignment::Left), "日本…");
    }

    #[test]
    fn flex_columns_split_by_weight() {
        let columns = [
            (ColumnWidth::Fixed(4), None),
            (ColumnWidth::Flex(1), None),
            (ColumnWidth::Flex(2), None),
        ];
        // 30 - 3 gaps - 3 checkbox - 4 fixed = 20 flexible
        assert_eq!(layout_widths(&columns, true, 30, 1), vec![3, 4, 6, 13]);
    }

    #[test]
    fn min_width_wins_when_space_runs_out() {
        let columns = [(ColumnWidth::Flex(1), Some(8)), (ColumnWidth::Flex(1), None)];
        assert_eq!(layout_widths(&columns, false, 6, 2), vec![8, 2]);
    }

    #[test]
    fn standard_variant_has_no_frame() {
        assert!(frame(TableVariant::Standard, 10).is_none());
        let framed = frame(TableVariant::Elevated, 6)
            .unwrap()
            .wrap(vec!["x".into()]);
        assert_eq!(framed, vec!["┏━━━━┓", "┃x   ┃", "┗━━━━┛"]);
    }
}
