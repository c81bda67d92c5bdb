mod common;

use cells::input::coordinates::screen_to_cell;
use cells::report::{ColumnType, Report, ReportRow};
use cells::surface::Surface;
use cells::widgets::toast::{Toast, ToastType};
use cells::widgets::table::ColumnSpan;
use cells::widgets::{StatusBar, StatusSlot, TableLayout};
use cells::{App, CellAddress};
use common::{sample_report, table_area};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::Terminal;

fn loaded_app() -> App {
    let mut app = App::default();
    app.report_name = "next".to_string();
    app.replace_surface(Surface::from_report(&sample_report()));
    app
}

fn draw(app: &mut App) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    terminal
}

fn line(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

#[test]
fn test_render_report_table() {
    let mut app = loaded_app();
    let terminal = draw(&mut app);
    let buffer = terminal.backend().buffer();

    assert!(line(buffer, 0).starts_with("next report"));

    let header = line(buffer, 1);
    assert_eq!(&header[0..2], "ID");
    assert_eq!(&header[3..14], "Description");
    assert_eq!(&header[15..18], "Due");
    assert_eq!(&header[26..33], "Project");

    let first = line(buffer, 2);
    assert_eq!(&first[3..8], "Alice");
    assert_eq!(&first[15..25], "2026-10-20");
    let second = line(buffer, 3);
    assert_eq!(&second[3..11], "Buy milk");
    assert_eq!(&second[26..33], "errands");

    // The draw records where the table went for hit testing
    assert_eq!(app.table_area, table_area());
}

#[test]
fn test_render_editing_cell_places_cursor() {
    let mut app = loaded_app();
    let controller = app.controller.clone();
    controller.enter_edit(&mut app.surface, CellAddress::new(0, 1));

    let mut terminal = draw(&mut app);
    assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(8, 2));

    let buffer = terminal.backend().buffer();
    assert_eq!(&line(buffer, 2)[3..8], "Alice");
    assert!(line(buffer, 11).contains("EDIT"));
}

#[test]
fn test_wide_chars_place_caret_and_clicks() {
    let mut report = sample_report();
    report.rows[0].attributes[1] = "日本".to_string();
    let mut app = loaded_app();
    app.replace_surface(Surface::from_report(&report));
    let controller = app.controller.clone();
    controller.enter_edit(&mut app.surface, CellAddress::new(0, 1));

    // Description starts at x=3 and each char takes two columns
    let mut terminal = draw(&mut app);
    assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(7, 2));

    assert_eq!(screen_to_cell(&app, 4, 2), Some((CellAddress::new(0, 1), 0)));
    assert_eq!(screen_to_cell(&app, 5, 2), Some((CellAddress::new(0, 1), 1)));
    assert_eq!(screen_to_cell(&app, 6, 2), Some((CellAddress::new(0, 1), 1)));
    assert_eq!(screen_to_cell(&app, 9, 2), Some((CellAddress::new(0, 1), 2)));
}

#[test]
fn test_table_layout_clamps_oversized_column() {
    let report = Report {
        title: "next report".to_string(),
        labels: vec!["Description".to_string()],
        column_types: vec![ColumnType::String],
        rows: vec![ReportRow {
            uuid: "u-1".to_string(),
            attributes: vec!["a".repeat(usize::from(u16::MAX) + 6)],
        }],
    };
    let surface = Surface::from_report(&report);
    let layout = TableLayout::compute(&surface, table_area(), 0);

    assert_eq!(layout.columns, vec![ColumnSpan { x: 0, width: 80 }]);
}

#[test]
fn test_render_empty_report() {
    let mut app = App::default();
    let terminal = draw(&mut app);
    let buffer = terminal.backend().buffer();

    assert!(line(buffer, 1).starts_with("No tasks"));
}

#[test]
fn test_render_status_bar_and_toast() {
    let mut app = loaded_app();
    app.toast_manager
        .add_toast(Toast::new("Report reloaded".to_string(), ToastType::Success));

    let terminal = draw(&mut app);
    let buffer = terminal.backend().buffer();

    let status = line(buffer, 11);
    assert!(status.contains("next report (2 tasks)"));
    assert!(status.contains("VIEW"));
    assert!(status.contains("on change: reload"));
    assert!(line(buffer, 2).contains("Report reloaded"));
}

#[test]
fn test_hidden_status_bar() {
    let mut app = loaded_app();
    app.ui.show_status_bar = false;

    let terminal = draw(&mut app);
    let buffer = terminal.backend().buffer();
    assert!(!line(buffer, 11).contains("VIEW"));
}

#[test]
fn test_table_layout_hit_testing() {
    let surface = Surface::from_report(&sample_report());
    let layout = TableLayout::compute(&surface, table_area(), 0);

    assert_eq!(layout.hit(4, 2), Some((CellAddress::new(0, 1), 1)));
    assert_eq!(layout.hit(26, 3), Some((CellAddress::new(1, 3), 0)));
    // Header, column gap, and rows past the end
    assert_eq!(layout.hit(4, 1), None);
    assert_eq!(layout.hit(2, 2), None);
    assert_eq!(layout.hit(4, 4), None);
    assert_eq!(layout.hit(40, 2), None);

    assert_eq!(
        layout.cell_rect(CellAddress::new(1, 1)).map(|r| (r.x, r.y, r.width)),
        Some((3, 3, 11))
    );
}

#[test]
fn test_table_layout_scrolled() {
    let surface = Surface::from_report(&sample_report());
    let layout = TableLayout::compute(&surface, table_area(), 1);

    assert_eq!(layout.row_range(), 1..2);
    assert_eq!(layout.hit(4, 2), Some((CellAddress::new(1, 1), 1)));
    assert_eq!(layout.cell_rect(CellAddress::new(0, 1)), None);
}

#[test]
fn test_status_bar_widget() {
    let mut status_bar = StatusBar::new();
    status_bar.set_slot(StatusSlot::new("left", "LEFT"));
    status_bar.set_slot(
        StatusSlot::new("right", "RIGHT").with_alignment(cells::widgets::SlotAlignment::Right),
    );
    assert_eq!(status_bar.slot_count(), 2);

    let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
    terminal
        .draw(|f| f.render_widget(status_bar.clone(), f.area()))
        .unwrap();

    let rendered = line(terminal.backend().buffer(), 0);
    assert_eq!(rendered, "LEFT           RIGHT");
}
