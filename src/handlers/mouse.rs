/// Mouse input handlers that subscribe to mouse events
use crate::controller::EditAction;
use crate::events::{AppEvent, EventBus};
use crate::handlers::cells::{activate_cell, blur_cell};
use crate::input::coordinates::screen_to_cell;
use crate::surface::session::CaretMovement;
use crate::App;
use anyhow::Result;
use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Mouse handler that processes mouse events
#[derive(Clone)]
pub struct MouseHandler {
    app_state: Arc<RwLock<App>>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl MouseHandler {
    pub fn new(app_state: Arc<RwLock<App>>, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            app_state,
            event_sender,
        }
    }

    /// Subscribe to mouse events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        let handler = self.clone();

        event_bus
            .subscribe("mouse_input", move |event| {
                let handler = handler.clone();
                async move { handler.handle_mouse_event(event).await }
            })
            .await;

        Ok(())
    }

    async fn handle_mouse_event(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::MouseInput(mouse) = event {
            self.handle_mouse(mouse).await?;
        }

        Ok(())
    }

    async fn handle_mouse(&self, mouse: MouseEvent) -> Result<()> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_press(mouse.column, mouse.row).await?;
            }
            MouseEventKind::ScrollUp => {
                let mut app = self.app_state.write().await;
                let step = app.ui.scroll_step as isize;
                app.scroll(-step);
            }
            MouseEventKind::ScrollDown => {
                let mut app = self.app_state.write().await;
                let step = app.ui.scroll_step as isize;
                app.scroll(step);
            }
            _ => {}
        }

        Ok(())
    }

    /// A press blurs the focused input when it lands elsewhere, then
    /// activates whatever cell is under it, in that order and in this turn.
    async fn handle_press(&self, mouse_x: u16, mouse_y: u16) -> Result<()> {
        let mut app = self.app_state.write().await;
        let editing = app.editing_cell();
        let hit = screen_to_cell(&app, mouse_x, mouse_y);

        if let Some(editing) = editing {
            match hit {
                Some((addr, offset)) if addr == editing => {
                    let App {
                        controller,
                        surface,
                        ..
                    } = &mut *app;
                    controller.edit(surface, addr, EditAction::Move(CaretMovement::To(offset)));
                    return Ok(());
                }
                _ => {
                    blur_cell(&mut app, editing, &self.event_sender)?;
                }
            }
        }

        if let Some((addr, _)) = hit {
            app.selected = addr;
            activate_cell(&mut app, addr);
        }

        Ok(())
    }
}
