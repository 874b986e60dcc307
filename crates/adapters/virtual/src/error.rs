//! Virtual adapter error types.

use minipool_domain::error::MiniPoolError;
use minipool_domain::state::ElementState;

/// Errors raised by simulated hardware.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The element was switched to unreachable and cannot be queried.
    #[error("{element} is unreachable")]
    Unreachable { element: String },

    /// The element refuses the command in its current state.
    #[error("{element} cannot accept commands while in {state}")]
    NotReady {
        element: String,
        state: ElementState,
    },
}

impl From<VirtualError> for MiniPoolError {
    fn from(err: VirtualError) -> Self {
        MiniPoolError::Inspection(Box::new(err))
    }
}
