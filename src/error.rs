//! Error types

use std::collections::TryReserveError;

/// Errors raised while building or addressing a field
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed input arrays or construction parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Storage for points or cells could not be reserved
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),
    /// A registry token that was never issued, or has already been released
    #[error("Invalid field handle: {0}")]
    InvalidHandle(u64),
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::AllocationFailure(e.to_string())
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::Error;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::InvalidInput("negative weight".to_string()).to_string(),
            "Invalid input: negative weight"
        );
        assert_eq!(
            Error::InvalidHandle(7).to_string(),
            "Invalid field handle: 7"
        );
    }

    #[test]
    fn test_from_try_reserve() {
        let mut v = Vec::<f64>::new();
        let e = v.try_reserve_exact(usize::MAX).unwrap_err();
        assert!(matches!(Error::from(e), Error::AllocationFailure(_)));
    }
}
