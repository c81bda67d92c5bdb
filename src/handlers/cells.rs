/// Delegated cell handlers.
///
/// Bound once on the event bus rather than per cell. Each event names a
/// position and the controller checks the cell found there at dispatch
/// time, so the handlers keep working after a reload replaces every row.
///
/// The keyboard and mouse handlers call [`activate_cell`] and [`blur_cell`]
/// directly under the write lock they already hold, so a focus change is
/// in effect before the next queued key or click is handled.
use crate::controller::{EnterOutcome, ExitOutcome};
use crate::events::{AppEvent, EventBus};
use crate::surface::CellAddress;
use crate::App;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct CellHandler {
    app_state: Arc<RwLock<App>>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl CellHandler {
    pub fn new(app_state: Arc<RwLock<App>>, event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            app_state,
            event_sender,
        }
    }

    /// Subscribe to activation and focus loss events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        event_bus
            .subscribe("cell_activated", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_activated(event).await }
                }
            })
            .await;

        event_bus
            .subscribe("cell_blurred", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_blurred(event).await }
                }
            })
            .await;

        Ok(())
    }

    async fn handle_activated(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::CellActivated { row, col } = event {
            let mut app = self.app_state.write().await;
            activate_cell(&mut app, CellAddress::new(row, col));
        }

        Ok(())
    }

    async fn handle_blurred(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::CellBlurred { row, col } = event {
            let mut app = self.app_state.write().await;
            blur_cell(&mut app, CellAddress::new(row, col), &self.event_sender)?;
        }

        Ok(())
    }
}

/// Mount an input on the cell at `addr` if it takes one.
///
/// Returns `None` when the activation was dropped because a reload is
/// about to replace the surface.
pub(crate) fn activate_cell(app: &mut App, addr: CellAddress) -> Option<EnterOutcome> {
    if app.reload_pending {
        tracing::debug!(row = addr.row, col = addr.col, "activation dropped, reload pending");
        return None;
    }

    let App {
        controller,
        surface,
        ..
    } = &mut *app;
    let outcome = controller.enter_edit(surface, addr);
    match &outcome {
        EnterOutcome::Entered => {
            app.selected = addr;
            app.clear_status_message();
        }
        EnterOutcome::NotEditable if app.controller.is_read_only() => {
            app.set_status_message("Read only mode");
        }
        EnterOutcome::NotEditable => {
            let label = app.surface.labels.get(addr.col).cloned().unwrap_or_default();
            app.set_status_message(format!("{} is not editable", label));
        }
        EnterOutcome::AlreadyEditing | EnterOutcome::Missing => {}
    }

    Some(outcome)
}

/// Take the input off `addr` now. Only the toast and the reload it may
/// lead to go through the bus.
pub(crate) fn blur_cell(
    app: &mut App,
    addr: CellAddress,
    event_sender: &mpsc::UnboundedSender<AppEvent>,
) -> Result<ExitOutcome> {
    let App {
        controller,
        surface,
        ..
    } = &mut *app;
    let outcome = controller.exit_edit(surface, addr);

    match &outcome {
        ExitOutcome::Unchanged(_) | ExitOutcome::NotEditing => {}
        ExitOutcome::Kept(value) => {
            event_sender.send(AppEvent::ToastMessage {
                message: format!("\"{}\" kept on screen only, not saved", value).into(),
                toast_type: "info".into(),
            })?;
        }
        ExitOutcome::ReloadRequested {
            identity,
            save_error,
            ..
        } => {
            app.reload_pending = true;

            let (message, toast_type) = match save_error {
                None => (format!("{} saved", identity.label), "success"),
                Some(reason) => (
                    format!("Change to {} discarded: {}", identity.label, reason),
                    "warning",
                ),
            };
            event_sender.send(AppEvent::ToastMessage {
                message: message.into(),
                toast_type: toast_type.into(),
            })?;
            event_sender.send(AppEvent::ReloadReport)?;
        }
    }

    Ok(outcome)
}
