/// Event handlers for the application
pub mod app_state;
pub mod cells;
pub mod keyboard;
pub mod mouse;

pub use app_state::AppStateHandler;
pub use cells::CellHandler;
pub use keyboard::KeyboardHandler;
pub use mouse::MouseHandler;
