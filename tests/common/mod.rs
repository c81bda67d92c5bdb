#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cells::app::subscribe_handlers;
use cells::cli::RunOpts;
use cells::events::{AppEvent, EventBus};
use cells::persistence::{PendingPersistence, Persistence, SubmitError};
use cells::report::{ColumnType, Report, ReportError, ReportRow, ReportSource, StaticSource};
use cells::surface::CellIdentity;
use cells::{App, CommitPolicy};
use futures::future::BoxFuture;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tokio::sync::RwLock;

pub const ALICE_UUID: &str = "a1b2c3d4-0000-4000-8000-000000000001";
pub const MILK_UUID: &str = "a1b2c3d4-0000-4000-8000-000000000002";

/// Two tasks, one column of every kind.
///
/// With the table drawn at `table_area()` the columns land at
/// ID x=0..2, Description x=3..14, Due x=15..25, Project x=26..33,
/// and rows 0 and 1 at y=2 and y=3.
pub fn sample_report() -> Report {
    Report {
        title: "next report".to_string(),
        labels: vec![
            "ID".to_string(),
            "Description".to_string(),
            "Due".to_string(),
            "Project".to_string(),
        ],
        column_types: vec![
            ColumnType::ReadOnly,
            ColumnType::String,
            ColumnType::String,
            ColumnType::String,
        ],
        rows: vec![
            ReportRow {
                uuid: ALICE_UUID.to_string(),
                attributes: vec![
                    "1".to_string(),
                    "Alice".to_string(),
                    "2026-10-20".to_string(),
                    "home".to_string(),
                ],
            },
            ReportRow {
                uuid: MILK_UUID.to_string(),
                attributes: vec![
                    "2".to_string(),
                    "Buy milk".to_string(),
                    String::new(),
                    "errands".to_string(),
                ],
            },
        ],
    }
}

pub fn table_area() -> Rect {
    Rect::new(0, 1, 80, 10)
}

/// Persistence hook that accepts everything and remembers what it was offered
#[derive(Default)]
pub struct RecordingPersistence {
    pub submitted: Mutex<Vec<(CellIdentity, String)>>,
}

impl Persistence for RecordingPersistence {
    fn submit(&self, identity: &CellIdentity, value: &str) -> Result<(), SubmitError> {
        self.submitted
            .lock()
            .unwrap()
            .push((identity.clone(), value.to_string()));
        Ok(())
    }
}

/// Persistence hook whose backend turns every change down
pub struct RejectingPersistence;

impl Persistence for RejectingPersistence {
    fn submit(&self, identity: &CellIdentity, _value: &str) -> Result<(), SubmitError> {
        Err(SubmitError::Rejected {
            uuid: identity.uuid.clone(),
            label: identity.label.clone(),
            reason: "task is locked".to_string(),
        })
    }
}

/// Serves the sample report once, then fails every later fetch
#[derive(Default)]
pub struct FailingAfterFirstSource {
    fetches: AtomicUsize,
}

impl ReportSource for FailingAfterFirstSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Report, ReportError>> {
        Box::pin(async move {
            if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(sample_report())
            } else {
                Err(ReportError::UnknownReport(name.to_string()))
            }
        })
    }
}

pub struct Harness {
    pub app: Arc<RwLock<App>>,
    pub bus: EventBus,
}

impl Harness {
    pub async fn new(policy: CommitPolicy, read_only: bool) -> Self {
        Self::with_persistence(policy, read_only, Arc::new(PendingPersistence)).await
    }

    pub async fn with_persistence(
        policy: CommitPolicy,
        read_only: bool,
        persistence: Arc<dyn Persistence>,
    ) -> Self {
        let source = StaticSource::new().with_report("next", sample_report());
        Self::build(policy, read_only, Arc::new(source), persistence).await
    }

    pub async fn with_source(policy: CommitPolicy, source: Arc<dyn ReportSource>) -> Self {
        Self::build(policy, false, source, Arc::new(PendingPersistence)).await
    }

    async fn build(
        policy: CommitPolicy,
        read_only: bool,
        source: Arc<dyn ReportSource>,
        persistence: Arc<dyn Persistence>,
    ) -> Self {
        let opts = RunOpts {
            report: "next".to_string(),
            on_change: policy,
            read_only,
            ..RunOpts::default()
        };
        let mut app = App::with_report(&opts, source, persistence)
            .await
            .unwrap();
        app.table_area = table_area();

        let app = Arc::new(RwLock::new(app));
        let bus = EventBus::new();
        subscribe_handlers(&app, &bus).await.unwrap();
        Self { app, bus }
    }

    /// Queue a left press without running the handlers
    pub fn queue_click(&self, x: u16, y: u16) {
        self.bus
            .publish(AppEvent::MouseInput(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            }))
            .unwrap();
    }

    /// Queue a key press without running the handlers
    pub fn queue_key(&self, code: KeyCode) {
        self.bus
            .publish(AppEvent::KeyInput(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    pub async fn process(&self) {
        self.bus.process_pending().await.unwrap();
    }

    pub async fn click(&self, x: u16, y: u16) {
        self.queue_click(x, y);
        self.process().await;
    }

    pub async fn key(&self, code: KeyCode) {
        self.queue_key(code);
        self.process().await;
    }

    pub async fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c)).await;
        }
    }

    pub async fn cell_text(&self, row: usize, col: usize) -> String {
        let app = self.app.read().await;
        app.surface
            .cell(cells::CellAddress::new(row, col))
            .map(|cell| cell.text().to_string())
            .unwrap_or_default()
    }
}
