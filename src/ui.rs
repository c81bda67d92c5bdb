use crate::input::coordinates::{caret_position, table_layout};
use crate::widgets::toast::ToastWidget;
use crate::widgets::ReportTable;
use crate::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

impl App {
    /// Main render function for the application UI
    pub fn render(&mut self, f: &mut Frame) {
        let status_height = u16::from(self.ui.show_status_bar);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),             // Title
                Constraint::Min(1),                // Table
                Constraint::Length(status_height), // Status line
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        self.render_table(f, chunks[1]);

        if self.ui.show_status_bar {
            self.update_status_bar();
            f.render_widget(self.status_bar.clone(), chunks[2]);
        }

        self.toast_manager.update();
        if self.toast_manager.has_active_toasts() {
            f.render_widget(ToastWidget::new(&self.toast_manager), f.area());
        }
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.surface.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.reload_pending {
            spans.push(Span::styled(
                "  reloading...",
                Style::default().fg(Color::Yellow),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Draw the table and place the terminal cursor on the focused input
    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        self.table_area = area;

        let layout = table_layout(self);
        let mut table = ReportTable::new(&self.surface, &layout);
        if !self.is_editing() {
            table = table.selected(self.selected);
        }
        f.render_widget(table, area);

        if let Some(position) = self
            .editing_cell()
            .and_then(|addr| caret_position(self, addr))
        {
            f.set_cursor_position(position);
        }
    }
}
