use anyhow::Result;
use futures::future::BoxFuture;
use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

/// All possible events in the application
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input events
    KeyInput(KeyEvent),

    /// Mouse input events
    MouseInput(MouseEvent),

    /// Activation of a table cell posted from outside the input handlers,
    /// which activate in place
    CellActivated { row: usize, col: usize },

    /// Focus loss of a cell's input posted from outside the input handlers
    CellBlurred { row: usize, col: usize },

    /// Rebuild the table from the report source
    ReloadReport,

    /// UI events
    StatusMessage {
        message: Arc<str>,
    },
    ToastMessage {
        message: Arc<str>,
        toast_type: Arc<str>,
    },

    /// Application lifecycle
    Quit,
}

impl AppEvent {
    /// Routing key handlers subscribe with
    pub fn event_type(&self) -> &'static str {
        match self {
            AppEvent::KeyInput(_) => "key_input",
            AppEvent::MouseInput(_) => "mouse_input",
            AppEvent::CellActivated { .. } => "cell_activated",
            AppEvent::CellBlurred { .. } => "cell_blurred",
            AppEvent::ReloadReport => "reload_report",
            AppEvent::StatusMessage { .. } => "status_message",
            AppEvent::ToastMessage { .. } => "toast_message",
            AppEvent::Quit => "quit",
        }
    }
}

/// Async event handler function type
pub type EventHandler = Arc<dyn Fn(AppEvent) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Event bus for publishing and subscribing to events.
///
/// Events are handled one at a time in publish order; a handler runs to
/// completion before the next event is looked at, so handlers never
/// interleave even though they are async.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<&'static str, Vec<EventHandler>>>>,

    sender: mpsc::UnboundedSender<AppEvent>,

    receiver: Arc<Mutex<Option<mpsc::UnboundedReceiver<AppEvent>>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            sender,
            receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    /// Get a sender for publishing events
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Subscribe to an event type with an async handler
    pub async fn subscribe<F, Fut>(&self, event_type: &'static str, handler: F)
    where
        F: Fn(AppEvent) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let boxed: EventHandler =
            Arc::new(move |event| -> BoxFuture<'static, Result<()>> { Box::pin(handler(event)) });

        let mut handlers = self.handlers.write().await;
        handlers.entry(event_type).or_default().push(boxed);
    }

    /// Number of handlers registered for an event type
    pub async fn handler_count(&self, event_type: &str) -> usize {
        self.handlers
            .read()
            .await
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Publish an event
    pub fn publish(&self, event: AppEvent) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }

    /// Start processing events (should be called once in a background task)
    pub async fn start_processing(&self) -> Result<()> {
        let mut receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event processor already started"))?;

        while let Some(event) = receiver.recv().await {
            self.handle_event(event).await;
        }

        Ok(())
    }

    /// Handle every queued event, including ones published while handling.
    /// Returns how many events were handled.
    pub async fn process_pending(&self) -> Result<usize> {
        let mut guard = self.receiver.lock().await;
        let receiver = guard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Event processor already started"))?;

        let mut handled = 0;
        while let Ok(event) = receiver.try_recv() {
            self.handle_event(event).await;
            handled += 1;
        }
        Ok(handled)
    }

    /// Handle a single event by calling all registered handlers
    async fn handle_event(&self, event: AppEvent) {
        let event_type = event.event_type();

        let event_handlers = {
            let handlers = self.handlers.read().await;
            handlers.get(event_type).cloned().unwrap_or_default()
        };

        for handler in event_handlers {
            if let Err(e) = handler(event.clone()).await {
                tracing::error!("Error in event handler for {}: {:#}", event_type, e);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
