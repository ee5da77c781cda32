pub mod remote;
pub mod store;
pub mod table;

pub use store::{ContentStore, StoreError};
pub use table::{EntityTable, FieldDef, FieldKind};
