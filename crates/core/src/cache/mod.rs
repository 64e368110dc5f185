mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{Freshness, QueryKey, Volatility};
pub use serialization::{deserialize_collection, serialize_collection};
pub use traits::Cache;
