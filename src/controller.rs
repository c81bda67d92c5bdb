//! Editable-cell controller
//!
//! Turns a display cell into an input control on activation and back on
//! focus loss. The controller does not hold on to cells: every call looks
//! the target up in the surface it is given and checks the structural
//! marker at that moment, so rows added or replaced by a reload are
//! covered without any rebinding.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::persistence::{PendingPersistence, Persistence};
use crate::report::ColumnType;
use crate::surface::session::CaretMovement;
use crate::surface::{Cell, CellAddress, CellIdentity, EditSession, Surface};

/// What happens when a cell loses focus holding a changed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Offer the value for saving, then reload the whole report
    #[default]
    Reload,
    /// Show the edited value; nothing is saved and nothing is reloaded
    Keep,
}

/// Result of activating a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// An input control now holds the cell's value
    Entered,
    /// The cell already had an input; the activation was swallowed
    AlreadyEditing,
    /// Cell is not a string field, or the table is read-only
    NotEditable,
    /// No cell at that address
    Missing,
}

/// Result of a cell losing focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Value unchanged, cell shows it again
    Unchanged(String),
    /// Value changed and the cell shows the edited text
    Kept(String),
    /// Value changed; the containing surface must be reloaded.
    /// `save_error` says why the persistence hook did not take the value.
    ReloadRequested {
        identity: CellIdentity,
        value: String,
        save_error: Option<String>,
    },
    /// No input control was mounted on the cell
    NotEditing,
}

/// Keystroke applied to the input control of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    Move(CaretMovement),
    Revert,
}

#[derive(Clone)]
pub struct EditableCellController {
    policy: CommitPolicy,
    read_only: bool,
    persistence: Arc<dyn Persistence>,
}

impl std::fmt::Debug for EditableCellController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableCellController")
            .field("policy", &self.policy)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl Default for EditableCellController {
    fn default() -> Self {
        Self::new(CommitPolicy::default(), Arc::new(PendingPersistence))
    }
}

impl EditableCellController {
    pub fn new(policy: CommitPolicy, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            policy,
            read_only: false,
            persistence,
        }
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether activation events on this cell are handled at all
    pub fn is_eligible(&self, cell: &Cell) -> bool {
        !self.read_only && cell.column_type == ColumnType::String
    }

    /// Swap the cell's text for an input control pre-filled with it
    pub fn enter_edit(&self, surface: &mut Surface, addr: CellAddress) -> EnterOutcome {
        let Some(cell) = surface.cell(addr) else {
            return EnterOutcome::Missing;
        };
        if !self.is_eligible(cell) {
            return EnterOutcome::NotEditable;
        }
        if cell.is_editing() {
            return EnterOutcome::AlreadyEditing;
        }

        let session = EditSession::new(cell.text());
        surface.mount_input(addr, session);
        tracing::debug!(row = addr.row, col = addr.col, "cell entered edit mode");
        EnterOutcome::Entered
    }

    /// Apply a keystroke to the cell's input; false when nothing is mounted
    pub fn edit(&self, surface: &mut Surface, addr: CellAddress, action: EditAction) -> bool {
        let Some(session) = surface.cell_mut(addr).and_then(Cell::session_mut) else {
            return false;
        };

        match action {
            EditAction::Insert(c) => session.insert_char(c),
            EditAction::Backspace => session.backspace(),
            EditAction::Delete => session.delete(),
            EditAction::Move(movement) => session.move_caret(movement),
            EditAction::Revert => session.revert(),
        }
        true
    }

    /// Take the input control off the cell and decide what the edit means
    pub fn exit_edit(&self, surface: &mut Surface, addr: CellAddress) -> ExitOutcome {
        let Some(session) = surface.cell(addr).and_then(Cell::session) else {
            return ExitOutcome::NotEditing;
        };

        if !session.is_changed() {
            let value = session.live_value().to_string();
            surface.unmount_input(addr, value.clone());
            tracing::debug!(row = addr.row, col = addr.col, "cell left edit mode unchanged");
            return ExitOutcome::Unchanged(value);
        }

        let value = session.live_value().to_string();
        let original = session.original_value().to_string();

        match self.policy {
            CommitPolicy::Keep => {
                surface.unmount_input(addr, value.clone());
                tracing::debug!(row = addr.row, col = addr.col, "edited value kept locally");
                ExitOutcome::Kept(value)
            }
            CommitPolicy::Reload => {
                // The surface is about to be rebuilt, show the old text meanwhile
                surface.unmount_input(addr, original);
                let Some(identity) = surface.identity(addr) else {
                    return ExitOutcome::NotEditing;
                };
                let save_error = match self.persistence.submit(&identity, &value) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::info!("edit not saved: {}", e);
                        Some(e.to_string())
                    }
                };
                ExitOutcome::ReloadRequested {
                    identity,
                    value,
                    save_error,
                }
            }
        }
    }
}
