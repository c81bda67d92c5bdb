use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::collections::HashMap;

/// Represents the alignment of a status bar slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotAlignment {
    Left,
    Center,
    Right,
}

/// Represents a single slot in the status bar
#[derive(Debug, Clone)]
pub struct StatusSlot {
    pub id: String,
    pub content: String,
    pub alignment: SlotAlignment,
    pub priority: u8, // Higher priority = shown first within alignment group
    pub style: Style,
    pub visible: bool,
}

impl StatusSlot {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            alignment: SlotAlignment::Left,
            priority: 50,
            style: Style::default().fg(Color::White).bg(Color::LightBlue),
            visible: true,
        }
    }

    pub fn with_alignment(mut self, alignment: SlotAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// One-line status bar made of prioritised slots
#[derive(Clone)]
pub struct StatusBar {
    slots: HashMap<String, StatusSlot>,
    background_style: Style,
    separator: String,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            background_style: Style::default().bg(Color::LightBlue).fg(Color::White),
            separator: " | ".to_string(),
        }
    }

    /// Add or update a slot in the status bar
    pub fn set_slot(&mut self, slot: StatusSlot) {
        self.slots.insert(slot.id.clone(), slot);
    }

    pub fn remove_slot(&mut self, id: &str) {
        self.slots.remove(id);
    }

    pub fn get_slot(&self, id: &str) -> Option<&StatusSlot> {
        self.slots.get(id)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Hide a slot without removing it
    pub fn hide_slot(&mut self, id: &str) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.visible = false;
        }
    }

    pub fn show_slot(&mut self, id: &str) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.visible = true;
        }
    }

    pub fn update_slot_content(&mut self, id: &str, content: impl Into<String>) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.content = content.into();
        }
    }

    /// Visible, non-empty slots of one alignment, highest priority first
    fn slots_for(&self, alignment: SlotAlignment) -> Vec<&StatusSlot> {
        let mut slots: Vec<&StatusSlot> = self
            .slots
            .values()
            .filter(|s| s.visible && !s.content.is_empty() && s.alignment == alignment)
            .collect();
        slots.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        slots
    }

    fn spans_for<'a>(&'a self, slots: &[&'a StatusSlot]) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        for (i, &slot) in slots.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator.as_str(), self.background_style));
            }
            spans.push(Span::styled(slot.content.as_str(), slot.style));
        }
        spans
    }
}

fn spans_width(spans: &[Span]) -> u16 {
    spans.iter().map(|span| span.width() as u16).sum()
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        buf.set_style(area, self.background_style);
        if area.width == 0 {
            return;
        }

        let left = self.spans_for(&self.slots_for(SlotAlignment::Left));
        let center = self.spans_for(&self.slots_for(SlotAlignment::Center));
        let right = self.spans_for(&self.slots_for(SlotAlignment::Right));

        let left_width = spans_width(&left);
        let center_width = spans_width(&center);
        let right_width = spans_width(&right);

        let mut line = Vec::new();
        let free = area.width.saturating_sub(left_width + right_width);
        line.extend(left);

        // Center content only shows when it fits between the two sides
        if center_width > 0 && free >= center_width {
            let before = (free - center_width) / 2;
            line.push(Span::styled(" ".repeat(before as usize), self.background_style));
            line.extend(center);
            let after = free - center_width - before;
            line.push(Span::styled(" ".repeat(after as usize), self.background_style));
        } else {
            line.push(Span::styled(" ".repeat(free as usize), self.background_style));
        }
        line.extend(right);

        Paragraph::new(Line::from(line))
            .style(self.background_style)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_slot_management() {
        let mut status_bar = StatusBar::new();

        status_bar.set_slot(StatusSlot::new("test", "content"));
        assert!(status_bar.slots.contains_key("test"));

        status_bar.hide_slot("test");
        assert!(!status_bar.slots["test"].visible);

        status_bar.show_slot("test");
        assert!(status_bar.slots["test"].visible);

        status_bar.update_slot_content("test", "new content");
        assert_eq!(status_bar.slots["test"].content, "new content");

        status_bar.remove_slot("test");
        assert!(!status_bar.slots.contains_key("test"));
    }

    #[test]
    fn test_empty_slots_are_skipped() {
        let mut status_bar = StatusBar::new();
        status_bar.set_slot(StatusSlot::new("empty", ""));
        status_bar.set_slot(StatusSlot::new("full", "x"));

        let slots = status_bar.slots_for(SlotAlignment::Left);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, "full");
    }
}
