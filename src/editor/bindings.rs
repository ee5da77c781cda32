//! UI-facing field bindings.
//!
//! A binding wraps one field of one entity and reads/writes through the
//! session's pending-change set. The displayed value is always
//! `pending.new_value ?? persisted`; the persisted value is never mutated
//! until a save confirms success. Bindings are inert while edit mode is off,
//! regardless of who is signed in.

use uuid::Uuid;

use crate::content::table::EntityTable;
use crate::editor::session::{EditorError, EditorSession};
use crate::editor::tracker::{ChangeKey, FieldValue};

/// Scalar text field binding with an explicit edit buffer.
///
/// `begin_edit` seeds the buffer from the displayed value; `commit` tracks a
/// change only when the buffer differs from what is displayed, and `cancel`
/// drops the buffer without tracking anything.
#[derive(Debug, Clone)]
pub struct TextBinding {
    table: EntityTable,
    id: Uuid,
    field: String,
    persisted: String,
    draft: Option<String>,
}

impl TextBinding {
    pub fn new(
        table: EntityTable,
        id: Uuid,
        field: impl Into<String>,
        persisted: impl Into<String>,
    ) -> Self {
        Self {
            table,
            id,
            field: field.into(),
            persisted: persisted.into(),
            draft: None,
        }
    }

    pub fn key(&self) -> ChangeKey {
        ChangeKey {
            table: self.table,
            id: self.id,
            field: self.field.clone(),
        }
    }

    /// Pending value if one exists, otherwise the persisted value. Read-only
    /// persisted value while edit mode is off.
    pub fn display_value<'a>(&'a self, session: &'a EditorSession) -> &'a str {
        if !session.edit_mode() {
            return &self.persisted;
        }
        match session.changes().get(&self.key()) {
            Some(change) => match &change.new_value {
                FieldValue::Text(s) => s,
                FieldValue::List(_) => &self.persisted,
            },
            None => &self.persisted,
        }
    }

    /// True when a pending change exists for this field (the visual marker)
    pub fn is_dirty(&self, session: &EditorSession) -> bool {
        session.changes().get(&self.key()).is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn begin_edit(&mut self, session: &EditorSession) -> Result<(), EditorError> {
        if !session.edit_mode() {
            return Err(EditorError::EditModeDisabled);
        }
        self.draft = Some(self.display_value(session).to_string());
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = Some(text.into());
    }

    /// Commit the buffer (blur/confirm key). A buffer equal to the displayed
    /// value tracks nothing; anything else goes through the tracker, which
    /// collapses an edit back to the original into a removal.
    pub fn commit(&mut self, session: &mut EditorSession) -> Result<(), EditorError> {
        if !session.edit_mode() {
            return Err(EditorError::EditModeDisabled);
        }

        let Some(draft) = self.draft.take() else {
            return Ok(());
        };

        if draft == self.display_value(session) {
            return Ok(());
        }

        let original = FieldValue::Text(self.persisted.clone());
        session.changes_mut().track(
            self.table,
            self.id,
            self.field.clone(),
            FieldValue::Text(draft),
            Some(original),
        );
        Ok(())
    }

    /// Revert key: drop the buffer, leaving the displayed value untouched
    pub fn cancel(&mut self) {
        self.draft = None;
    }
}

/// Ordered string-list binding. Every mutation recomputes the full sequence
/// and tracks it as a whole-value replacement.
#[derive(Debug, Clone)]
pub struct ListBinding {
    table: EntityTable,
    id: Uuid,
    field: String,
    persisted: Vec<String>,
}

impl ListBinding {
    pub fn new(
        table: EntityTable,
        id: Uuid,
        field: impl Into<String>,
        persisted: Vec<String>,
    ) -> Self {
        Self {
            table,
            id,
            field: field.into(),
            persisted,
        }
    }

    pub fn key(&self) -> ChangeKey {
        ChangeKey {
            table: self.table,
            id: self.id,
            field: self.field.clone(),
        }
    }

    pub fn display_items<'a>(&'a self, session: &'a EditorSession) -> &'a [String] {
        if !session.edit_mode() {
            return &self.persisted;
        }
        match session.changes().get(&self.key()) {
            Some(change) => match &change.new_value {
                FieldValue::List(items) => items,
                FieldValue::Text(_) => &self.persisted,
            },
            None => &self.persisted,
        }
    }

    pub fn is_dirty(&self, session: &EditorSession) -> bool {
        session.changes().get(&self.key()).is_some()
    }

    /// Append an item. Whitespace-only input is ignored.
    pub fn push(&self, session: &mut EditorSession, item: &str) -> Result<(), EditorError> {
        if !session.edit_mode() {
            return Err(EditorError::EditModeDisabled);
        }

        let item = item.trim();
        if item.is_empty() {
            return Ok(());
        }

        let mut items = self.display_items(session).to_vec();
        items.push(item.to_string());
        self.track(session, items);
        Ok(())
    }

    pub fn remove_at(&self, session: &mut EditorSession, index: usize) -> Result<(), EditorError> {
        if !session.edit_mode() {
            return Err(EditorError::EditModeDisabled);
        }

        let mut items = self.display_items(session).to_vec();
        if index >= items.len() {
            return Err(EditorError::IndexOutOfBounds(index));
        }

        items.remove(index);
        self.track(session, items);
        Ok(())
    }

    pub fn replace_at(
        &self,
        session: &mut EditorSession,
        index: usize,
        item: impl Into<String>,
    ) -> Result<(), EditorError> {
        if !session.edit_mode() {
            return Err(EditorError::EditModeDisabled);
        }

        let mut items = self.display_items(session).to_vec();
        if index >= items.len() {
            return Err(EditorError::IndexOutOfBounds(index));
        }

        items[index] = item.into();
        self.track(session, items);
        Ok(())
    }

    fn track(&self, session: &mut EditorSession, items: Vec<String>) {
        session.changes_mut().track(
            self.table,
            self.id,
            self.field.clone(),
            FieldValue::List(items),
            Some(FieldValue::List(self.persisted.clone())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::session::Identity;

    fn editing_session() -> EditorSession {
        let mut session = EditorSession::with_allow_list(vec!["admin@example.com".to_string()]);
        session.sign_in(Identity {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
        });
        session.enable_edit_mode().unwrap();
        session
    }

    #[test]
    fn text_commit_tracks_a_real_difference() {
        let mut session = editing_session();
        let id = Uuid::new_v4();
        let mut binding = TextBinding::new(EntityTable::Projects, id, "title_en", "Old");

        binding.begin_edit(&session).unwrap();
        binding.set_draft("New");
        binding.commit(&mut session).unwrap();

        assert!(binding.is_dirty(&session));
        assert_eq!(binding.display_value(&session), "New");
        assert_eq!(session.changes().len(), 1);
    }

    #[test]
    fn text_commit_of_identical_value_tracks_nothing() {
        let mut session = editing_session();
        let mut binding =
            TextBinding::new(EntityTable::Projects, Uuid::new_v4(), "title_en", "Old");

        binding.begin_edit(&session).unwrap();
        binding.commit(&mut session).unwrap();

        assert!(!binding.is_dirty(&session));
        assert!(session.changes().is_empty());
    }

    #[test]
    fn text_edit_back_to_persisted_collapses_the_pending_change() {
        let mut session = editing_session();
        let id = Uuid::new_v4();
        let mut binding = TextBinding::new(EntityTable::Projects, id, "title_en", "Old");

        binding.begin_edit(&session).unwrap();
        binding.set_draft("New");
        binding.commit(&mut session).unwrap();
        assert_eq!(session.changes().len(), 1);

        binding.begin_edit(&session).unwrap();
        binding.set_draft("Old");
        binding.commit(&mut session).unwrap();

        assert!(session.changes().is_empty());
        assert_eq!(binding.display_value(&session), "Old");
    }

    #[test]
    fn text_cancel_restores_displayed_value_without_tracking() {
        let mut session = editing_session();
        let mut binding =
            TextBinding::new(EntityTable::Projects, Uuid::new_v4(), "title_en", "Old");

        binding.begin_edit(&session).unwrap();
        binding.set_draft("half-typed");
        binding.cancel();

        assert!(!binding.is_editing());
        assert_eq!(binding.display_value(&session), "Old");
        assert!(session.changes().is_empty());
    }

    #[test]
    fn bindings_are_inert_when_edit_mode_is_off() {
        let mut session = EditorSession::with_allow_list(vec!["admin@example.com".to_string()]);
        session.sign_in(Identity {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
        });

        let mut text = TextBinding::new(EntityTable::Projects, Uuid::new_v4(), "title_en", "Old");
        assert_eq!(
            text.begin_edit(&session),
            Err(EditorError::EditModeDisabled)
        );
        assert_eq!(text.display_value(&session), "Old");

        let list = ListBinding::new(
            EntityTable::SkillCategories,
            Uuid::new_v4(),
            "skills",
            vec!["Rust".to_string()],
        );
        assert_eq!(
            list.push(&mut session, "Go"),
            Err(EditorError::EditModeDisabled)
        );
        assert_eq!(list.display_items(&session), ["Rust".to_string()]);
    }

    #[test]
    fn list_mutations_track_the_whole_sequence() {
        let mut session = editing_session();
        let id = Uuid::new_v4();
        let binding = ListBinding::new(
            EntityTable::WorkExperiences,
            id,
            "points_en",
            vec!["only one".to_string()],
        );

        // Remove the only remaining element, then add two new ones: a single
        // tracked change whose value is the 2-element sequence in order.
        binding.remove_at(&mut session, 0).unwrap();
        binding.push(&mut session, "first new").unwrap();
        binding.push(&mut session, "second new").unwrap();

        assert_eq!(session.changes().len(), 1);
        let change = session.changes().get(&binding.key()).unwrap();
        assert_eq!(
            change.new_value,
            FieldValue::List(vec!["first new".to_string(), "second new".to_string()])
        );
        assert_eq!(
            change.original_value,
            FieldValue::List(vec!["only one".to_string()])
        );
    }

    #[test]
    fn list_replace_at_and_bounds() {
        let mut session = editing_session();
        let binding = ListBinding::new(
            EntityTable::SkillCategories,
            Uuid::new_v4(),
            "skills",
            vec!["Rust".to_string(), "SQL".to_string()],
        );

        binding.replace_at(&mut session, 1, "Postgres").unwrap();
        assert_eq!(
            binding.display_items(&session),
            ["Rust".to_string(), "Postgres".to_string()]
        );

        assert_eq!(
            binding.remove_at(&mut session, 5),
            Err(EditorError::IndexOutOfBounds(5))
        );
    }

    #[test]
    fn list_push_ignores_blank_input() {
        let mut session = editing_session();
        let binding = ListBinding::new(
            EntityTable::SkillCategories,
            Uuid::new_v4(),
            "skills",
            vec!["Rust".to_string()],
        );

        binding.push(&mut session, "   ").unwrap();
        assert!(session.changes().is_empty());

        binding.push(&mut session, "  Go  ").unwrap();
        assert_eq!(
            binding.display_items(&session),
            ["Rust".to_string(), "Go".to_string()]
        );
    }

    #[test]
    fn list_edit_back_to_original_collapses() {
        let mut session = editing_session();
        let binding = ListBinding::new(
            EntityTable::SkillCategories,
            Uuid::new_v4(),
            "skills",
            vec!["Rust".to_string()],
        );

        binding.push(&mut session, "Go").unwrap();
        assert_eq!(session.changes().len(), 1);

        binding.remove_at(&mut session, 1).unwrap();
        assert!(session.changes().is_empty());
    }
}
