use madrasa_core::error::CoreError;

use crate::store::StoreError;

/// Error returned by the strict (`try_*`) facade methods.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// The store could not be contacted; distinct from an empty result.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DataError::Store(e) if e.is_unreachable())
    }

    /// Rejected client-side before any store call.
    pub fn is_validation(&self) -> bool {
        matches!(self, DataError::Core(CoreError::Validation(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::Core(CoreError::NotFound { .. }))
    }

    pub fn user_message(&self) -> String {
        match self {
            DataError::Core(e) => e.user_message(),
            DataError::Store(e) => e.user_message(),
        }
    }
}
