use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::surface::{Cell, CellAddress, Surface};

/// Blank columns between two table columns
pub const COLUMN_GAP: u16 = 1;

/// Horizontal placement of one column on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub x: u16,
    pub width: u16,
}

/// Where every visible cell of a surface lands inside a screen area.
///
/// Rendering and mouse hit testing both go through this, so a click always
/// resolves to the cell that was drawn under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub area: Rect,
    /// Spans of the columns that fit, left to right
    pub columns: Vec<ColumnSpan>,
    pub first_row: usize,
    pub row_count: usize,
}

impl TableLayout {
    pub fn compute(surface: &Surface, area: Rect, first_row: usize) -> Self {
        let mut columns = Vec::new();
        let mut x = area.x;
        for width in surface.column_widths() {
            if x >= area.right() {
                break;
            }
            let width = u16::try_from(width)
                .unwrap_or(u16::MAX)
                .min(area.right() - x);
            columns.push(ColumnSpan { x, width });
            x = x.saturating_add(width).saturating_add(COLUMN_GAP);
        }

        Self {
            area,
            columns,
            first_row,
            row_count: surface.row_count(),
        }
    }

    /// Number of report rows that fit below the header
    pub fn visible_rows(&self) -> usize {
        (self.area.height as usize).saturating_sub(1)
    }

    /// Report rows on screen, as a range of row indices
    pub fn row_range(&self) -> std::ops::Range<usize> {
        let start = self.first_row.min(self.row_count);
        let end = (self.first_row + self.visible_rows()).min(self.row_count);
        start..end
    }

    /// Cell under a screen position, with the terminal column inside the cell
    pub fn hit(&self, x: u16, y: u16) -> Option<(CellAddress, usize)> {
        let area = self.area;
        if x < area.x || x >= area.right() || y <= area.y || y >= area.bottom() {
            return None;
        }

        let row = self.first_row + (y - area.y - 1) as usize;
        if row >= self.row_count {
            return None;
        }

        let col = self
            .columns
            .iter()
            .position(|span| x >= span.x && x < span.x + span.width)?;
        let column = (x - self.columns[col].x) as usize;
        Some((CellAddress::new(row, col), column))
    }

    /// Screen rectangle of a cell, if it is visible
    pub fn cell_rect(&self, addr: CellAddress) -> Option<Rect> {
        if !self.row_range().contains(&addr.row) {
            return None;
        }
        let span = self.columns.get(addr.col)?;
        let y = self.area.y + 1 + (addr.row - self.first_row) as u16;
        Some(Rect::new(span.x, y, span.width, 1))
    }
}

/// Renders a surface as a plain text table
pub struct ReportTable<'a> {
    surface: &'a Surface,
    layout: &'a TableLayout,
    selected: Option<CellAddress>,
}

impl<'a> ReportTable<'a> {
    pub fn new(surface: &'a Surface, layout: &'a TableLayout) -> Self {
        Self {
            surface,
            layout,
            selected: None,
        }
    }

    pub fn selected(mut self, selected: CellAddress) -> Self {
        self.selected = Some(selected);
        self
    }

    fn cell_style(cell: &Cell, selected: bool) -> Style {
        if cell.is_editing() {
            return Style::default().fg(Color::Black).bg(Color::Yellow);
        }

        let style = match cell.class() {
            "ro" => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };

        if selected {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }
}

impl Widget for ReportTable<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let layout = self.layout;
        if area.height == 0 {
            return;
        }

        if self.surface.column_count() == 0 || self.surface.row_count() == 0 {
            buf.set_string(
                area.x,
                area.y,
                "No tasks",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let header_style = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED);
        for (label, span) in self.surface.labels.iter().zip(&layout.columns) {
            buf.set_stringn(span.x, area.y, label, span.width as usize, header_style);
        }

        for row in layout.row_range() {
            let Some(surface_row) = self.surface.rows.get(row) else {
                break;
            };
            for (col, cell) in surface_row.cells.iter().enumerate() {
                let addr = CellAddress::new(row, col);
                let Some(rect) = layout.cell_rect(addr) else {
                    continue;
                };
                let style = Self::cell_style(cell, self.selected == Some(addr));
                if cell.is_editing() {
                    buf.set_style(rect, style);
                }
                buf.set_stringn(rect.x, rect.y, cell.text(), rect.width as usize, style);
            }
        }
    }
}
