//! Inline editing core: change tracking, field bindings, the editor session
//! and the batch persistence engine.

pub mod bindings;
pub mod engine;
pub mod session;
pub mod tracker;

pub use bindings::{ListBinding, TextBinding};
pub use engine::{BatchReport, EntityUpdate};
pub use session::{EditExit, EditorError, EditorSession, Identity, SaveReport};
pub use tracker::{ChangeKey, ChangeSet, FieldValue, PendingChange};
