use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::time::{Duration, Instant};

/// Type of toast notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastType {
    fn color(&self) -> Color {
        match self {
            ToastType::Info => Color::Cyan,
            ToastType::Success => Color::Green,
            ToastType::Warning => Color::Yellow,
            ToastType::Error => Color::Red,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastType::Info => "ℹ",
            ToastType::Success => "✓",
            ToastType::Warning => "⚠",
            ToastType::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: String, toast_type: ToastType) -> Self {
        // Errors and discarded edits stay up longer
        let secs = match toast_type {
            ToastType::Warning | ToastType::Error => 5,
            ToastType::Info | ToastType::Success => 3,
        };
        Self {
            message,
            toast_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Toast notification manager and renderer
pub struct ToastManager {
    toasts: Vec<Toast>,
    max_toasts: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            max_toasts: 4,
        }
    }

    pub fn add_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);

        // Remove oldest toasts if we exceed the maximum
        if self.toasts.len() > self.max_toasts {
            let excess = self.toasts.len() - self.max_toasts;
            self.toasts.drain(..excess);
        }
    }

    /// Remove expired toasts
    pub fn update(&mut self) {
        self.toasts.retain(|toast| !toast.is_expired());
    }

    pub fn has_active_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn render(&self, area: Rect, buf: &mut TuiBuffer) {
        // Stack in the top-right corner, 3 lines per toast
        let toast_width = 48u16.min(area.width / 2).max(12u16.min(area.width));
        let x = area.right().saturating_sub(toast_width + 1);

        for (i, toast) in self.toasts.iter().enumerate() {
            let y = area.y + 1 + i as u16 * 3;
            if y + 3 > area.bottom() {
                break;
            }
            render_single_toast(toast, Rect::new(x, y, toast_width, 3), buf);
        }
    }
}

fn render_single_toast(toast: &Toast, area: Rect, buf: &mut TuiBuffer) {
    let color = toast.toast_type.color();

    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));
    let inner = block.inner(area);
    block.render(area, buf);

    let max_chars = (inner.width as usize).saturating_sub(2);
    let message: String = if toast.message.chars().count() > max_chars {
        let mut truncated: String = toast
            .message
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect();
        truncated.push_str("...");
        truncated
    } else {
        toast.message.clone()
    };

    let content = Line::from(vec![
        Span::styled(
            format!("{} ", toast.toast_type.icon()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message, Style::default().fg(Color::White)),
    ]);
    Paragraph::new(content).render(inner, buf);
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient widget wrapper for rendering toasts
pub struct ToastWidget<'a> {
    manager: &'a ToastManager,
}

impl<'a> ToastWidget<'a> {
    pub fn new(manager: &'a ToastManager) -> Self {
        Self { manager }
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        self.manager.render(area, buf);
    }
}
