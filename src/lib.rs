//! Taskwarrior report viewer with in-place editable cells

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod input;
pub mod input_system;
pub mod logging;
pub mod persistence;
pub mod report;
pub mod surface;
pub mod ui;
pub mod widgets;

// Re-export main types for convenience
pub use app::App;
pub use controller::{CommitPolicy, EditableCellController};
pub use surface::{CellAddress, Surface};
