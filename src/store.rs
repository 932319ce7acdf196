//! Mail store: where mail records live between box sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::StoreError;
use crate::model::{MailRecord, ViewerId};

/// Lookup and persistence of mail records.
///
/// `Ok(None)` means "no such mail" and is not an error; `Err` is reserved
/// for the store itself failing.
pub trait MailStore {
    /// Delivered mail by index.
    fn get_mail(&self, index: u32) -> Result<Option<MailRecord>, StoreError>;

    /// The draft `viewer` is currently composing.
    fn get_editmode_mail(&self, viewer: &ViewerId) -> Result<Option<MailRecord>, StoreError>;

    /// Persist `mail`, replacing any stored version.
    fn save_mail(&self, mail: &MailRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    mails: HashMap<u32, MailRecord>,
    drafts: HashMap<ViewerId, MailRecord>,
    saves: usize,
    fail_saves: bool,
    fail_lookups: bool,
}

/// In-memory mail store. Drafts are keyed by their sender.
#[derive(Debug, Default)]
pub struct MemoryMailStore {
    state: Mutex<StoreState>,
}

impl MemoryMailStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a delivered mail.
    pub fn insert(&self, mail: MailRecord) {
        self.state().mails.insert(mail.index, mail);
    }

    /// Delete a delivered mail.
    pub fn remove(&self, index: u32) -> Option<MailRecord> {
        self.state().mails.remove(&index)
    }

    /// Start or replace the draft its sender is composing.
    pub fn set_draft(&self, draft: MailRecord) {
        self.state().drafts.insert(draft.sender.clone(), draft);
    }

    /// Discard the draft of `viewer`.
    pub fn clear_draft(&self, viewer: &ViewerId) -> Option<MailRecord> {
        self.state().drafts.remove(viewer)
    }

    /// Number of successful `save_mail` calls.
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    /// Make subsequent saves fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    /// Make subsequent `get_mail` / `get_editmode_mail` calls fail.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.state().fail_lookups = fail;
    }

    /// All delivered mails, ordered by index.
    pub fn mails(&self) -> Vec<MailRecord> {
        let mut mails: Vec<_> = self.state().mails.values().cloned().collect();
        mails.sort_by_key(|m| m.index);
        mails
    }

    /// All drafts, ordered by sender.
    pub fn drafts(&self) -> Vec<(ViewerId, MailRecord)> {
        let mut drafts: Vec<_> = self
            .state()
            .drafts
            .iter()
            .map(|(v, m)| (v.clone(), m.clone()))
            .collect();
        drafts.sort_by(|a, b| a.0.cmp(&b.0));
        drafts
    }
}

impl MailStore for MemoryMailStore {
    fn get_mail(&self, index: u32) -> Result<Option<MailRecord>, StoreError> {
        let state = self.state();
        if state.fail_lookups {
            return Err(StoreError::Lookup(format!("mail #{index} unreachable")));
        }
        Ok(state.mails.get(&index).cloned())
    }

    fn get_editmode_mail(&self, viewer: &ViewerId) -> Result<Option<MailRecord>, StoreError> {
        let state = self.state();
        if state.fail_lookups {
            return Err(StoreError::Lookup(format!("draft of {viewer} unreachable")));
        }
        Ok(state.drafts.get(viewer).cloned())
    }

    fn save_mail(&self, mail: &MailRecord) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.fail_saves {
            return Err(StoreError::SaveFailed {
                index: mail.index,
                reason: "store is read-only".to_string(),
            });
        }

        if mail.edit_mode {
            state.drafts.insert(mail.sender.clone(), mail.clone());
        } else {
            state.mails.insert(mail.index, mail.clone());
        }
        state.saves += 1;
        debug!(index = mail.index, draft = mail.edit_mode, "Saved mail");
        Ok(())
    }
}
