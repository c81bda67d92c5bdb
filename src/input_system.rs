use crate::events::{AppEvent, EventBus};
use anyhow::{Context, Result};
use ratatui::crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;

/// Turns raw terminal input into bus events
pub struct InputSystem {
    event_bus: EventBus,
}

impl InputSystem {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Publish a terminal event; returns false for events nothing listens to
    pub fn handle_terminal_event(&self, event: Event) -> Result<bool> {
        let app_event = match event {
            // Windows reports both press and release
            Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::KeyInput(key),
            Event::Mouse(mouse) => AppEvent::MouseInput(mouse),
            _ => return Ok(false),
        };

        self.event_bus
            .publish(app_event)
            .context("Failed to publish input event")?;
        Ok(true)
    }

    /// Get the event bus sender for direct event publishing
    pub fn event_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_bus.sender()
    }
}
