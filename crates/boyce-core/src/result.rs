//! Convenience result type alias for Boyce.

use crate::error::AppError;

/// A specialized `Result` type for Boyce operations.
pub type AppResult<T> = Result<T, AppError>;
