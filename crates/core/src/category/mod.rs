mod error;
mod operations;

pub use error::{CategoryError, Result};
pub use operations::{validate_category_name, DeletionImpact, DeletionVerdict};
