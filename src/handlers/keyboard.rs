use crate::controller::EditAction;
use crate::events::{AppEvent, EventBus};
use crate::handlers::cells::{activate_cell, blur_cell};
use crate::surface::session::CaretMovement;
use crate::surface::CellAddress;
use crate::App;
use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Keyboard handler that processes keyboard events
#[derive(Clone)]
pub struct KeyboardHandler {
    app_state: Arc<RwLock<App>>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl KeyboardHandler {
    pub fn new(app_state: Arc<RwLock<App>>, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            app_state,
            event_sender,
        }
    }

    /// Subscribe to keyboard events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        let handler = self.clone();

        event_bus
            .subscribe("key_input", move |event| {
                let handler = handler.clone();
                async move { handler.handle_key_event(event).await }
            })
            .await;

        Ok(())
    }

    async fn handle_key_event(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::KeyInput(key) = event {
            let editing = self.app_state.read().await.editing_cell();

            match editing {
                Some(addr) => self.handle_editing_key(addr, key).await?,
                None => self.handle_browse_key(key).await?,
            }
        }

        Ok(())
    }

    /// Keys while no input control is mounted
    async fn handle_browse_key(&self, key: KeyEvent) -> Result<()> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.event_sender.send(AppEvent::Quit)?;
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) | (KeyCode::F(5), _) => {
                self.event_sender.send(AppEvent::ReloadReport)?;
            }
            (KeyCode::Enter, _) | (KeyCode::Char('e'), KeyModifiers::NONE) => {
                let mut app = self.app_state.write().await;
                let selected = app.selected;
                activate_cell(&mut app, selected);
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.app_state.write().await.move_selection(-1, 0);
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                self.app_state.write().await.move_selection(1, 0);
            }
            (KeyCode::Left, _)
            | (KeyCode::Char('h'), KeyModifiers::NONE)
            | (KeyCode::BackTab, _) => {
                self.app_state.write().await.move_selection(0, -1);
            }
            (KeyCode::Right, _)
            | (KeyCode::Char('l'), KeyModifiers::NONE)
            | (KeyCode::Tab, _) => {
                self.app_state.write().await.move_selection(0, 1);
            }
            (KeyCode::PageUp, _) => {
                let mut app = self.app_state.write().await;
                let page = app.visible_rows() as isize;
                app.move_selection(-page, 0);
            }
            (KeyCode::PageDown, _) => {
                let mut app = self.app_state.write().await;
                let page = app.visible_rows() as isize;
                app.move_selection(page, 0);
            }
            (KeyCode::Home, _) => {
                self.app_state.write().await.select_column(0);
            }
            (KeyCode::End, _) => {
                self.app_state.write().await.select_column(usize::MAX);
            }
            (KeyCode::Esc, _) => {
                self.app_state.write().await.clear_status_message();
            }
            _ => {}
        }

        Ok(())
    }

    /// Keys while `addr` holds the focused input control.
    ///
    /// Focus loss happens before this returns, so whatever key is queued
    /// next already sees the cell as text.
    async fn handle_editing_key(&self, addr: CellAddress, key: KeyEvent) -> Result<()> {
        let mut app = self.app_state.write().await;

        let action = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                blur_cell(&mut app, addr, &self.event_sender)?;
                self.event_sender.send(AppEvent::Quit)?;
                return Ok(());
            }
            (KeyCode::Enter, _) | (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                blur_cell(&mut app, addr, &self.event_sender)?;
                return Ok(());
            }
            (KeyCode::Esc, _) => EditAction::Revert,
            (KeyCode::Up, _) | (KeyCode::Down, _) => {
                blur_cell(&mut app, addr, &self.event_sender)?;
                let delta = if key.code == KeyCode::Up { -1 } else { 1 };
                app.move_selection(delta, 0);
                return Ok(());
            }
            (KeyCode::Char(c), modifiers)
                if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT =>
            {
                EditAction::Insert(c)
            }
            (KeyCode::Backspace, _) => EditAction::Backspace,
            (KeyCode::Delete, _) => EditAction::Delete,
            (KeyCode::Left, _) => EditAction::Move(CaretMovement::Left),
            (KeyCode::Right, _) => EditAction::Move(CaretMovement::Right),
            (KeyCode::Home, _) => EditAction::Move(CaretMovement::Start),
            (KeyCode::End, _) => EditAction::Move(CaretMovement::End),
            _ => return Ok(()),
        };

        let App {
            controller,
            surface,
            ..
        } = &mut *app;
        controller.edit(surface, addr, action);

        // Escape reverts, then leaves the input like any other focus loss
        if action == EditAction::Revert {
            blur_cell(&mut app, addr, &self.event_sender)?;
        }

        Ok(())
    }
}
