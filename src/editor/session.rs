//! The editing session: identity, edit mode, the pending-change set and the
//! save busy-flag. Constructed once per page lifetime and passed by reference
//! to bindings and the persistence engine; there is no ambient global.

use uuid::Uuid;

use crate::auth;
use crate::config;
use crate::content::store::ContentStore;
use crate::editor::engine;
use crate::editor::tracker::ChangeSet;

/// The identity the auth collaborator handed back on sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("signed-in identity is not an administrator")]
    Forbidden,
    #[error("a save is already in flight")]
    SaveInProgress,
    #[error("edit mode is disabled")]
    EditModeDisabled,
    #[error("list index {0} out of bounds")]
    IndexOutOfBounds(usize),
}

/// Result of asking to leave edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditExit {
    Exited,
    /// The pending set is non-empty; call again with `force` to drop it
    ConfirmationRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub success: bool,
    pub entities_attempted: usize,
    pub entities_failed: usize,
}

pub struct EditorSession {
    identity: Option<Identity>,
    edit_mode: bool,
    pending: ChangeSet,
    saving: bool,
    admin_emails: Vec<String>,
}

impl EditorSession {
    /// Session gated on the configured admin allow-list
    pub fn new() -> Self {
        Self::with_allow_list(config::config().security.admin_emails.clone())
    }

    pub fn with_allow_list(admin_emails: Vec<String>) -> Self {
        Self {
            identity: None,
            edit_mode: false,
            pending: ChangeSet::new(),
            saving: false,
            admin_emails,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity
            .as_ref()
            .map(|identity| auth::is_admin_email(&identity.email, &self.admin_emails))
            .unwrap_or(false)
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.pending
    }

    pub fn changes_mut(&mut self) -> &mut ChangeSet {
        &mut self.pending
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.pending.has_unsaved_changes()
    }

    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Sign-out resets the whole editing state: edit mode off, pending
    /// changes dropped.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.edit_mode = false;
        self.pending.clear();
    }

    /// Enter edit mode. The gate here is UX convenience; the server
    /// re-checks authority on every mutation.
    pub fn enable_edit_mode(&mut self) -> Result<(), EditorError> {
        self.require_admin()?;
        self.edit_mode = true;
        Ok(())
    }

    /// Leave edit mode. A dirty pending set requires `force`; the caller is
    /// expected to confirm with the user first.
    pub fn disable_edit_mode(&mut self, force: bool) -> EditExit {
        if self.pending.has_unsaved_changes() && !force {
            return EditExit::ConfirmationRequired;
        }
        self.edit_mode = false;
        self.pending.clear();
        EditExit::Exited
    }

    /// Drop every pending change, keeping edit mode as-is
    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    fn require_admin(&self) -> Result<(), EditorError> {
        let identity = self.identity.as_ref().ok_or(EditorError::Unauthenticated)?;
        if !auth::is_admin_email(&identity.email, &self.admin_emails) {
            return Err(EditorError::Forbidden);
        }
        Ok(())
    }

    /// Persist the entire pending set: grouped per entity, issued
    /// concurrently. All-success clears the set; any failure keeps every
    /// change pending so a later save retries the lot.
    pub async fn save_all_changes(
        &mut self,
        store: &dyn ContentStore,
    ) -> Result<SaveReport, EditorError> {
        self.require_admin()?;

        if self.saving {
            return Err(EditorError::SaveInProgress);
        }

        if self.pending.is_empty() {
            return Ok(SaveReport {
                success: true,
                entities_attempted: 0,
                entities_failed: 0,
            });
        }

        self.saving = true;
        let updates = engine::group_changes(&self.pending);
        let report = engine::persist_all(store, updates).await;
        self.saving = false;

        if report.all_succeeded() {
            self.pending.clear();
        } else {
            tracing::warn!(
                "batch save failed for {} of {} entities; keeping all changes pending",
                report.failed,
                report.attempted
            );
        }

        Ok(SaveReport {
            success: report.all_succeeded(),
            entities_attempted: report.attempted,
            entities_failed: report.failed,
        })
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
