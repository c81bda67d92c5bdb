// Mapping between screen positions and table cells

use crate::surface::{char_index_at_column, CellAddress};
use crate::widgets::table::TableLayout;
use crate::App;
use ratatui::layout::{Position, Rect};

/// Layout of the table as it was last drawn
pub fn table_layout(app: &App) -> TableLayout {
    TableLayout::compute(&app.surface, app.table_area, app.scroll_offset)
}

/// Cell under a mouse position and the char offset of the position inside it
pub fn screen_to_cell(app: &App, mouse_x: u16, mouse_y: u16) -> Option<(CellAddress, usize)> {
    let (addr, column) = table_layout(app).hit(mouse_x, mouse_y)?;
    let offset = app
        .surface
        .cell(addr)
        .map_or(column, |cell| char_index_at_column(cell.text(), column));
    Some((addr, offset))
}

/// Screen rectangle of a cell, if it is on screen
pub fn cell_to_screen(app: &App, addr: CellAddress) -> Option<Rect> {
    table_layout(app).cell_rect(addr)
}

/// Terminal cursor position for the caret of the input mounted on `addr`
pub fn caret_position(app: &App, addr: CellAddress) -> Option<Position> {
    let rect = cell_to_screen(app, addr)?;
    let caret = app.surface.cell(addr)?.session()?.caret_column();
    let caret = u16::try_from(caret).unwrap_or(u16::MAX);
    let x = rect.x + caret.min(rect.width.saturating_sub(1));
    Some(Position::new(x, rect.y))
}
