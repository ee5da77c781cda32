mod batch;
mod create;
mod delete;
mod list;
mod update;

pub use batch::batch;
pub use create::create;
pub use delete::delete;
pub use list::list;
pub use update::update;

use std::str::FromStr;

use uuid::Uuid;

use crate::content::table::EntityTable;
use crate::error::ApiError;

/// Parse the path segment against the allow-list. Runs before auth so an
/// unknown table is a 400 for everyone and never reaches the store.
pub(crate) fn parse_table(raw: &str) -> Result<EntityTable, ApiError> {
    EntityTable::from_str(raw)
        .map_err(|_| ApiError::bad_request(format!("invalid table name: {}", raw)))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::validation_error(format!("invalid entity id: {}", raw), None))
}
