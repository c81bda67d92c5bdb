pub mod status_bar;
pub mod table;
pub mod toast;

pub use status_bar::{SlotAlignment, StatusBar, StatusSlot};
pub use table::{ReportTable, TableLayout};
