/// Application state handlers that respond to events
use crate::events::{AppEvent, EventBus};
use crate::surface::Surface;
use crate::widgets::toast::{Toast, ToastType};
use crate::App;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// App state handler that manages application state in response to events
#[derive(Clone)]
pub struct AppStateHandler {
    app_state: Arc<RwLock<App>>,
}

impl AppStateHandler {
    pub fn new(app_state: Arc<RwLock<App>>) -> Self {
        Self { app_state }
    }

    /// Subscribe to all relevant events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        event_bus
            .subscribe("status_message", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_status_message(event).await }
                }
            })
            .await;

        event_bus
            .subscribe("toast_message", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_toast_message(event).await }
                }
            })
            .await;

        event_bus
            .subscribe("reload_report", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_reload(event).await }
                }
            })
            .await;

        event_bus
            .subscribe("quit", {
                let handler = self.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_quit(event).await }
                }
            })
            .await;

        Ok(())
    }

    async fn handle_status_message(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::StatusMessage { message } = event {
            let mut app = self.app_state.write().await;
            app.set_status_message(message.as_ref());
        }

        Ok(())
    }

    async fn handle_toast_message(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::ToastMessage {
            message,
            toast_type,
        } = event
        {
            let mut app = self.app_state.write().await;
            if !app.ui.show_toasts {
                app.set_status_message(message.as_ref());
                return Ok(());
            }

            let toast_type = match toast_type.as_ref() {
                "error" => ToastType::Error,
                "success" => ToastType::Success,
                "warning" => ToastType::Warning,
                _ => ToastType::Info,
            };
            app.toast_manager
                .add_toast(Toast::new(message.to_string(), toast_type));
        }

        Ok(())
    }

    /// Re-read the report. The source is queried without holding the lock
    /// so the screen keeps drawing while `task` runs.
    async fn handle_reload(&self, event: AppEvent) -> Result<()> {
        if !matches!(event, AppEvent::ReloadReport) {
            return Ok(());
        }

        let (source, report_name) = {
            let app = self.app_state.read().await;
            (app.source.clone(), app.report_name.clone())
        };

        let result = source.fetch(&report_name).await;

        let mut app = self.app_state.write().await;
        match result {
            Ok(report) => {
                app.replace_surface(Surface::from_report(&report));
                app.set_status_message("Report reloaded");
            }
            Err(e) => {
                tracing::error!("Failed to reload report '{}': {}", report_name, e);
                app.reload_pending = false;
                app.toast_manager.add_toast(Toast::new(
                    format!("Reload failed: {}", e),
                    ToastType::Error,
                ));
            }
        }

        Ok(())
    }

    async fn handle_quit(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::Quit = event {
            let mut app = self.app_state.write().await;
            app.running = false;
        }

        Ok(())
    }
}
