use thiserror::Error;

/// Error type for console state-synchronization operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A backend request failed.
    #[error(transparent)]
    Api(#[from] dialdeck_api::Error),
}

impl CoreError {
    /// Whether this failure is expected to self-heal on the next poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
        }
    }
}
