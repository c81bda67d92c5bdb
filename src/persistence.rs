/// Outbound hook for committed cell values
use thiserror::Error;

use crate::surface::CellIdentity;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("saving edited values is not implemented")]
    Unimplemented,

    #[error("could not save {label} of task {uuid}: {reason}")]
    Rejected {
        uuid: String,
        label: String,
        reason: String,
    },
}

/// Receives committed values on their way to the backing store
pub trait Persistence: Send + Sync {
    fn submit(&self, cell: &CellIdentity, value: &str) -> Result<(), SubmitError>;
}

/// Placeholder until saving is wired up; every submission fails
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingPersistence;

impl Persistence for PendingPersistence {
    fn submit(&self, cell: &CellIdentity, value: &str) -> Result<(), SubmitError> {
        tracing::warn!(
            uuid = %cell.uuid,
            label = %cell.label,
            value,
            "edited value dropped, saving is not implemented"
        );
        Err(SubmitError::Unimplemented)
    }
}
