//! Result type alias for repair and edit operations

use crate::error::KintsuError;

/// Standard Result type for repair and edit operations
pub type Result<T> = std::result::Result<T, KintsuError>;
