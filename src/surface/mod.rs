//! The presentation tree a report is rendered from
//!
//! A surface is a table of cells. Each cell carries the structural marker
//! of its column and either plain text or a mounted input control. Nothing
//! outside this module swaps cell content directly; the controller goes
//! through [`Surface::mount_input`] and [`Surface::unmount_input`].

pub mod session;

use ratatui::text::Span;

use crate::report::{ColumnType, Report};

pub use session::EditSession;

/// Position of a cell in the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Identity of a cell outside the surface: the task and the column it shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellIdentity {
    pub uuid: String,
    pub label: String,
}

/// What a cell currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Input(EditSession),
}

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column_type: ColumnType,
    pub content: CellContent,
}

impl Cell {
    pub fn new(column_type: ColumnType, text: impl Into<String>) -> Self {
        Self {
            column_type,
            content: CellContent::Text(text.into()),
        }
    }

    /// Structural marker of the cell, e.g. `str`
    pub fn class(&self) -> &'static str {
        self.column_type.class()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.content, CellContent::Input(_))
    }

    /// Text currently displayed, or the live value of the input
    pub fn text(&self) -> &str {
        match &self.content {
            CellContent::Text(text) => text,
            CellContent::Input(session) => session.live_value(),
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.content {
            CellContent::Input(session) => Some(session),
            CellContent::Text(_) => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match &mut self.content {
            CellContent::Input(session) => Some(session),
            CellContent::Text(_) => None,
        }
    }
}

/// A row of cells belonging to one task
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRow {
    pub uuid: String,
    pub cells: Vec<Cell>,
}

/// The table a report is displayed on
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    pub title: String,
    pub labels: Vec<String>,
    pub rows: Vec<SurfaceRow>,
}

impl Surface {
    /// Build a fresh surface in display state from a report
    pub fn from_report(report: &Report) -> Self {
        let rows = report
            .rows
            .iter()
            .map(|row| SurfaceRow {
                uuid: row.uuid.clone(),
                cells: report
                    .column_types
                    .iter()
                    .enumerate()
                    .map(|(col, column_type)| {
                        let text = row.attributes.get(col).cloned().unwrap_or_default();
                        Cell::new(*column_type, text)
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: report.title.clone(),
            labels: report.labels.clone(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.labels.len()
    }

    pub fn cell(&self, addr: CellAddress) -> Option<&Cell> {
        self.rows.get(addr.row)?.cells.get(addr.col)
    }

    pub fn cell_mut(&mut self, addr: CellAddress) -> Option<&mut Cell> {
        self.rows.get_mut(addr.row)?.cells.get_mut(addr.col)
    }

    /// Identity of the cell for anything outside the surface
    pub fn identity(&self, addr: CellAddress) -> Option<CellIdentity> {
        let row = self.rows.get(addr.row)?;
        let label = self.labels.get(addr.col)?;
        Some(CellIdentity {
            uuid: row.uuid.clone(),
            label: label.clone(),
        })
    }

    /// Replace the text of a cell with an input control holding `session`.
    ///
    /// Returns false and leaves the cell untouched when an input is already
    /// mounted, so a cell never holds more than one.
    pub fn mount_input(&mut self, addr: CellAddress, session: EditSession) -> bool {
        match self.cell_mut(addr) {
            Some(cell) if !cell.is_editing() => {
                cell.content = CellContent::Input(session);
                true
            }
            _ => false,
        }
    }

    /// Take the input control off a cell and show `text` instead
    pub fn unmount_input(&mut self, addr: CellAddress, text: String) -> Option<EditSession> {
        let cell = self.cell_mut(addr)?;
        match std::mem::replace(&mut cell.content, CellContent::Text(text)) {
            CellContent::Input(session) => Some(session),
            previous => {
                cell.content = previous;
                None
            }
        }
    }

    /// Address of the cell currently holding an input control, if any
    pub fn editing_cell(&self) -> Option<CellAddress> {
        self.rows.iter().enumerate().find_map(|(row, surface_row)| {
            surface_row
                .cells
                .iter()
                .position(Cell::is_editing)
                .map(|col| CellAddress::new(row, col))
        })
    }

    /// Number of mounted input controls across the surface
    pub fn input_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.is_editing())
            .count()
    }

    /// Terminal width of every column, header included
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.labels.iter().map(|l| display_width(l)).collect();
        for row in &self.rows {
            for (col, cell) in row.cells.iter().enumerate() {
                if let Some(width) = widths.get_mut(col) {
                    // Leave room for the caret at the end of an input
                    let extra = usize::from(cell.is_editing());
                    *width = (*width).max(display_width(cell.text()) + extra);
                }
            }
        }
        widths
    }
}

/// Terminal columns taken by `text`; wide chars count twice
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Char index of whatever is drawn at terminal column `column` of `text`,
/// or the char count when the column lies past the end
pub fn char_index_at_column(text: &str, column: usize) -> usize {
    let mut end = 0;
    for (index, c) in text.chars().enumerate() {
        end += display_width(c.encode_utf8(&mut [0; 4]));
        if end > column {
            return index;
        }
    }
    text.chars().count()
}
