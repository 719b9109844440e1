use std::collections::TryReserveError;

use thiserror::Error;

use super::registry::GroupKey;
use crate::sys::host::WindowId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),
    #[error("Group not found: {0:?}")]
    GroupNotFound(GroupKey),
    #[error("Allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
    #[error("No free group id left")]
    IdSpaceExhausted,
}
