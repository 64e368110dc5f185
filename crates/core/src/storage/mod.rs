mod error;
mod http_mapping;
mod mapping;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use http_mapping::repository_error_from_status;
pub use mapping::{
    columns, decode_row, decode_rows, encode_row, encode_rows, infer_organizer_kind,
    needs_organizer_fallback, EventRow,
};
pub use traits::{ObjectStorage, RemoteFunctions, Store};
pub use types::{matches_all, DateRange, Filter, ObjectHandle, Row, Table};
