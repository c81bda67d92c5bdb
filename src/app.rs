use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::event,
    layout::Rect,
    Terminal,
};
use tokio::sync::RwLock;

use crate::cli::RunOpts;
use crate::config::UiConfig;
use crate::controller::EditableCellController;
use crate::events::EventBus;
use crate::handlers::{AppStateHandler, CellHandler, KeyboardHandler, MouseHandler};
use crate::input_system::InputSystem;
use crate::persistence::{PendingPersistence, Persistence};
use crate::report::{ReportSource, StaticSource};
use crate::surface::{CellAddress, Surface};
use crate::widgets::toast::ToastManager;
use crate::widgets::StatusBar;

/// Contains global state that needs to be shared
pub struct App {
    /// Whether the application is running
    pub running: bool,

    /// Name of the taskwarrior report on screen
    pub report_name: String,

    /// The table currently displayed
    pub surface: Surface,

    /// Keyboard selection, also the target of Enter
    pub selected: CellAddress,

    /// First report row shown in the table area
    pub scroll_offset: usize,

    /// Handles activation and focus loss on cells
    pub controller: EditableCellController,

    /// Where the surface is loaded from
    pub source: Arc<dyn ReportSource>,

    /// Set once a blur asked for a reload; clicks are ignored until it is done
    pub reload_pending: bool,

    /// Number of times the report was loaded
    pub load_count: usize,

    /// Message to display on status bar
    pub status_message: Option<String>,

    /// Toast notification manager
    pub toast_manager: ToastManager,

    /// Status bar with slot-based system
    pub status_bar: StatusBar,

    /// UI settings
    pub ui: UiConfig,

    /// Screen area the table was last drawn in, used for hit testing
    pub table_area: Rect,
}

impl App {
    /// Create an app with an empty table; call [`App::load`] to fill it
    pub fn new(
        opts: &RunOpts,
        source: Arc<dyn ReportSource>,
        persistence: Arc<dyn Persistence>,
    ) -> Self {
        let controller = EditableCellController::new(opts.on_change, persistence)
            .with_read_only(opts.read_only);

        let mut app = Self {
            running: true,
            report_name: opts.report.clone(),
            surface: Surface::default(),
            selected: CellAddress::new(0, 0),
            scroll_offset: 0,
            controller,
            source,
            reload_pending: false,
            load_count: 0,
            status_message: None,
            toast_manager: ToastManager::new(),
            status_bar: StatusBar::new(),
            ui: opts.ui.clone(),
            table_area: Rect::default(),
        };

        app.init_status_bar();
        app
    }

    /// Create an app and load its report
    pub async fn with_report(
        opts: &RunOpts,
        source: Arc<dyn ReportSource>,
        persistence: Arc<dyn Persistence>,
    ) -> Result<Self> {
        let mut app = Self::new(opts, source, persistence);
        app.load().await?;
        Ok(app)
    }

    /// Fetch the report and rebuild the surface from it
    pub async fn load(&mut self) -> Result<()> {
        let source = self.source.clone();
        let report = source
            .fetch(&self.report_name)
            .await
            .with_context(|| format!("Failed to load report '{}'", self.report_name))?;
        self.replace_surface(Surface::from_report(&report));
        Ok(())
    }

    /// Swap in a freshly loaded surface; any mounted input goes away with the old one
    pub fn replace_surface(&mut self, surface: Surface) {
        self.surface = surface;
        self.reload_pending = false;
        self.load_count += 1;
        self.clamp_selection();
        tracing::info!(
            report = %self.report_name,
            rows = self.surface.row_count(),
            "report loaded"
        );
    }

    /// Run the application until it quits
    pub async fn run(self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let app_state = Arc::new(RwLock::new(self));

        let event_bus = EventBus::new();
        let input_system = InputSystem::new(event_bus.clone());
        subscribe_handlers(&app_state, &event_bus).await?;

        let event_bus_clone = event_bus.clone();
        tokio::spawn(async move {
            if let Err(e) = event_bus_clone.start_processing().await {
                tracing::error!("Event processing error: {}", e);
            }
        });

        let frame_duration = Duration::from_millis(16);
        let mut last_frame: Option<Instant> = None;

        loop {
            let frame_start = Instant::now();

            if !app_state.read().await.running {
                break;
            }

            if last_frame.map_or(true, |last| frame_start.duration_since(last) >= frame_duration) {
                let mut app = app_state.write().await;
                terminal
                    .draw(|f| app.render(f))
                    .context("Rendering error")?;
                drop(app);
                last_frame = Some(frame_start);
            }

            if event::poll(Duration::from_millis(1))? {
                if let Err(e) = input_system.handle_terminal_event(event::read()?) {
                    tracing::error!("Error handling input: {}", e);
                }
            } else {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }

        Ok(())
    }

    /// Address of the cell holding an input control, if any
    pub fn editing_cell(&self) -> Option<CellAddress> {
        self.surface.editing_cell()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_cell().is_some()
    }

    /// Move the keyboard selection, staying inside the table
    pub fn move_selection(&mut self, row_delta: isize, col_delta: isize) {
        self.selected.row = self.selected.row.saturating_add_signed(row_delta);
        self.selected.col = self.selected.col.saturating_add_signed(col_delta);
        self.clamp_selection();
        self.ensure_selection_visible();
    }

    /// Jump the selection to a column
    pub fn select_column(&mut self, col: usize) {
        self.selected.col = col;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected.row = self
            .selected
            .row
            .min(self.surface.row_count().saturating_sub(1));
        self.selected.col = self
            .selected
            .col
            .min(self.surface.column_count().saturating_sub(1));
        self.scroll_offset = self
            .scroll_offset
            .min(self.surface.row_count().saturating_sub(1));
    }

    /// Rows of the table area available for report rows (the header takes one)
    pub fn visible_rows(&self) -> usize {
        (self.table_area.height as usize).saturating_sub(1).max(1)
    }

    /// Scroll so the selected row is on screen
    pub fn ensure_selection_visible(&mut self) {
        let visible = self.visible_rows();
        let row = self.selected.row;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible {
            self.scroll_offset = row + 1 - visible;
        }
    }

    /// Scroll the table by `delta` rows without touching the selection
    pub fn scroll(&mut self, delta: isize) {
        let max_scroll = self.surface.row_count().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max_scroll);
    }

    /// Set a status message
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    /// Initialize the status bar with default slots
    pub fn init_status_bar(&mut self) {
        use crate::widgets::{SlotAlignment, StatusSlot};
        use ratatui::style::{Color, Style};

        let report_slot = StatusSlot::new("report", "")
            .with_alignment(SlotAlignment::Left)
            .with_priority(100);
        self.status_bar.set_slot(report_slot);

        let cell_slot = StatusSlot::new("cell", "")
            .with_alignment(SlotAlignment::Left)
            .with_priority(90);
        self.status_bar.set_slot(cell_slot);

        let message_slot = StatusSlot::new("message", "")
            .with_alignment(SlotAlignment::Center)
            .with_priority(70)
            .with_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .with_visibility(false);
        self.status_bar.set_slot(message_slot);

        let mode_slot = StatusSlot::new("mode", "VIEW")
            .with_alignment(SlotAlignment::Right)
            .with_priority(100)
            .with_style(Style::default().fg(Color::White).bg(Color::DarkGray));
        self.status_bar.set_slot(mode_slot);

        let policy_slot = StatusSlot::new("policy", "")
            .with_alignment(SlotAlignment::Right)
            .with_priority(60)
            .with_style(Style::default().fg(Color::Gray).bg(Color::LightBlue));
        self.status_bar.set_slot(policy_slot);
    }

    /// Update status bar slots with current application state
    pub fn update_status_bar(&mut self) {
        let report_info = format!("{} ({} tasks)", self.surface.title, self.surface.row_count());
        self.status_bar.update_slot_content("report", report_info);

        let cell_info = match self.surface.labels.get(self.selected.col) {
            Some(label) if self.surface.row_count() > 0 => {
                format!("Row {}, {}", self.selected.row + 1, label)
            }
            _ => String::new(),
        };
        self.status_bar.update_slot_content("cell", cell_info);

        match &self.status_message {
            Some(message) => {
                self.status_bar.update_slot_content("message", message.as_str());
                self.status_bar.show_slot("message");
            }
            None => self.status_bar.hide_slot("message"),
        }

        let mode_text = if self.controller.is_read_only() {
            "READ ONLY"
        } else if self.is_editing() {
            "EDIT"
        } else {
            "VIEW"
        };
        self.status_bar.update_slot_content("mode", mode_text);

        let policy_text = format!("on change: {:?}", self.controller.policy()).to_lowercase();
        self.status_bar.update_slot_content("policy", policy_text);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            &RunOpts::default(),
            Arc::new(StaticSource::new()),
            Arc::new(PendingPersistence),
        )
    }
}

/// Bind every handler to the bus
pub async fn subscribe_handlers(app_state: &Arc<RwLock<App>>, event_bus: &EventBus) -> Result<()> {
    let sender = event_bus.sender();

    KeyboardHandler::new(app_state.clone(), sender.clone())
        .subscribe(event_bus)
        .await?;
    MouseHandler::new(app_state.clone(), sender.clone())
        .subscribe(event_bus)
        .await?;
    CellHandler::new(app_state.clone(), sender)
        .subscribe(event_bus)
        .await?;
    AppStateHandler::new(app_state.clone())
        .subscribe(event_bus)
        .await?;

    Ok(())
}
