//! The box manager: which container exists for which viewer or mail,
//! and how its contents flow back into the mail record.
//!
//! Three caches live behind one mutex:
//! - edit-mode boxes, keyed by viewer, one per viewer composing a draft;
//! - attachment boxes, keyed by mail index, one per delivered mail;
//! - active views, viewer to the key of the box they last opened
//!   (`0` for their edit-mode box).
//!
//! Every public operation takes the lock exactly once, so creating an
//! attachment box and emptying the mail's attachment list happen as a
//! single step for any other caller.

pub mod layout;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::{BoxesConfig, Config, TitlesConfig};
use crate::error::{BoxError, Result};
use crate::host::DisplaySurface;
use crate::model::mail::EDITMODE_INDEX;
use crate::model::slots::non_empty_items;
use crate::model::{ItemStack, MailRecord, ViewerId};
use crate::store::MailStore;

/// Result of [`BoxManager::sync_attach_box`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The viewer has no box open.
    NothingOpen,
    /// The mail behind the open box no longer exists.
    MailMissing { index: u32 },
    /// No cached box for the viewer's active key.
    BoxMissing { index: u32 },
    /// The box contents were written to the mail and saved.
    Saved { index: u32, attachments: usize },
}

#[derive(Debug, Clone)]
struct CachedBox<H> {
    handle: H,
    title: String,
}

struct BoxState<H> {
    editmode_boxes: HashMap<ViewerId, CachedBox<H>>,
    attachment_boxes: HashMap<u32, CachedBox<H>>,
    active_views: HashMap<ViewerId, u32>,
    boxes: BoxesConfig,
    titles: TitlesConfig,
}

/// Owns box existence, sizing, titling, and the sync path.
pub struct BoxManager<S: DisplaySurface, M> {
    surface: S,
    store: M,
    state: Mutex<BoxState<S::Handle>>,
}

impl<S: DisplaySurface, M: MailStore> BoxManager<S, M> {
    pub fn new(surface: S, store: M, config: &Config) -> Self {
        Self {
            surface,
            store,
            state: Mutex::new(BoxState {
                editmode_boxes: HashMap::new(),
                attachment_boxes: HashMap::new(),
                active_views: HashMap::new(),
                boxes: config.boxes.clone(),
                titles: config.titles.clone(),
            }),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, BoxState<S::Handle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply new box settings. Boxes that already exist keep their size and title.
    pub fn reload_config(&self, config: &Config) {
        let mut state = self.lock();
        state.boxes = config.boxes.clone();
        state.titles = config.titles.clone();
        debug!(rows = state.boxes.effective_rows(), "Reloaded box settings");
    }

    // ── Display ─────────────────────────────────────────────────

    /// Show `viewer` their edit-mode box, creating it on first use.
    pub fn display_editmode_box(&self, viewer: &ViewerId) -> Result<S::Handle> {
        let mut state = self.lock();
        Ok(self.open_editmode_box(&mut state, viewer)?.handle)
    }

    /// Show `viewer` the attachment box of `mail`, creating it on first use.
    ///
    /// Creation re-reads the mail from the store, moves its attachments
    /// into the box, saves the emptied mail and copies it into `mail`. On
    /// any failure `mail` is left untouched and no box is cached.
    pub fn display_attachment_box(
        &self,
        viewer: &ViewerId,
        mail: &mut MailRecord,
    ) -> Result<S::Handle> {
        let mut state = self.lock();
        Ok(self.open_attachment_box(&mut state, viewer, mail)?.handle)
    }

    /// Show `viewer` the box for `mail` and remember it as their active view.
    ///
    /// Drafts open the viewer's edit-mode box, delivered mails their
    /// attachment box.
    pub fn display_attach_box(&self, viewer: &ViewerId, mail: &mut MailRecord) -> Result<S::Handle> {
        let mut state = self.lock();
        let opened = if mail.edit_mode {
            self.open_editmode_box(&mut state, viewer)?
        } else {
            self.open_attachment_box(&mut state, viewer, mail)?
        };

        self.surface.bind_viewer(viewer, &opened.title);
        state.active_views.insert(viewer.clone(), mail.view_key());
        Ok(opened.handle)
    }

    fn open_editmode_box(
        &self,
        state: &mut BoxState<S::Handle>,
        viewer: &ViewerId,
    ) -> Result<CachedBox<S::Handle>> {
        if let Some(cached) = state.editmode_boxes.get(viewer) {
            debug!(viewer = %viewer, "Reopening edit-mode box");
            self.surface.present(&cached.handle, viewer)?;
            return Ok(cached.clone());
        }

        let size = layout::editmode_box_size(state.boxes.effective_rows());
        let title = layout::editmode_box_title(&state.titles);
        let handle = self.surface.create_container(size, &title)?;
        self.surface.present(&handle, viewer)?;

        debug!(viewer = %viewer, size, "Created edit-mode box");
        let cached = CachedBox { handle, title };
        state.editmode_boxes.insert(viewer.clone(), cached.clone());
        Ok(cached)
    }

    fn open_attachment_box(
        &self,
        state: &mut BoxState<S::Handle>,
        viewer: &ViewerId,
        mail: &mut MailRecord,
    ) -> Result<CachedBox<S::Handle>> {
        if mail.index == EDITMODE_INDEX {
            return Err(BoxError::ReservedIndex);
        }
        if let Some(cached) = state.attachment_boxes.get(&mail.index) {
            debug!(viewer = %viewer, index = mail.index, "Reopening attachment box");
            self.surface.present(&cached.handle, viewer)?;
            return Ok(cached.clone());
        }

        // The caller's copy may predate an earlier open or close; the store decides.
        let mut current = match self.store.get_mail(mail.index)? {
            Some(fresh) => fresh,
            None => mail.clone(),
        };
        let items = current.take_attachments();
        let cached = self.build_attachment_box(&state.titles, viewer, &current, &items)?;
        info!(
            viewer = %viewer,
            index = current.index,
            items = items.len(),
            "Moved attachments into box"
        );
        state.attachment_boxes.insert(current.index, cached.clone());
        *mail = current;
        Ok(cached)
    }

    /// Create, fill, persist, present. `mail` has already been emptied.
    fn build_attachment_box(
        &self,
        titles: &TitlesConfig,
        viewer: &ViewerId,
        mail: &MailRecord,
        items: &[ItemStack],
    ) -> Result<CachedBox<S::Handle>> {
        let size = layout::attachment_box_size(items.len());
        let title = layout::attachment_box_title(titles, mail.index);
        let handle = self.surface.create_container(size, &title)?;

        for item in items {
            if self.surface.add_item(&handle, item.clone())?.is_some() {
                return Err(BoxError::SlotOverflow {
                    index: mail.index,
                    capacity: size,
                    count: items.len(),
                });
            }
        }

        self.store.save_mail(mail)?;

        if let Err(e) = self.surface.present(&handle, viewer) {
            let mut restored = mail.clone();
            restored.attachments = items.to_vec();
            if let Err(save_err) = self.store.save_mail(&restored) {
                warn!(
                    index = mail.index,
                    error = %save_err,
                    "Could not restore attachments after failed presentation"
                );
            }
            return Err(e.into());
        }

        Ok(CachedBox { handle, title })
    }

    // ── Edit-mode box lookup ────────────────────────────────────

    /// The edit-mode box of `viewer`, if one exists. Never creates.
    pub fn get_editmode_box(&self, viewer: &ViewerId) -> Option<S::Handle> {
        self.lock()
            .editmode_boxes
            .get(viewer)
            .map(|cached| cached.handle.clone())
    }

    /// Forget the edit-mode box of `viewer`. Returns whether one existed.
    pub fn clear_editmode_box(&self, viewer: &ViewerId) -> bool {
        let removed = self.lock().editmode_boxes.remove(viewer).is_some();
        if removed {
            debug!(viewer = %viewer, "Cleared edit-mode box");
        }
        removed
    }

    // ── Sync ────────────────────────────────────────────────────

    /// Write the contents of the box `viewer` has open back into its mail.
    ///
    /// Missing mails and boxes are reported as outcomes, not errors. Store
    /// and host failures propagate; the active view is kept so the caller
    /// can retry.
    pub fn sync_attach_box(&self, viewer: &ViewerId) -> Result<SyncOutcome> {
        let mut state = self.lock();
        let Some(&index) = state.active_views.get(viewer) else {
            return Ok(SyncOutcome::NothingOpen);
        };

        let (mail, cached) = if index == EDITMODE_INDEX {
            (
                self.store.get_editmode_mail(viewer)?,
                state.editmode_boxes.get(viewer),
            )
        } else {
            (
                self.store.get_mail(index)?,
                state.attachment_boxes.get(&index),
            )
        };

        let Some(handle) = cached.map(|c| c.handle.clone()) else {
            warn!(viewer = %viewer, index, "No box to sync");
            state.active_views.remove(viewer);
            return Ok(SyncOutcome::BoxMissing { index });
        };
        let Some(mut mail) = mail else {
            warn!(viewer = %viewer, index, "Mail vanished before sync");
            state.active_views.remove(viewer);
            return Ok(SyncOutcome::MailMissing { index });
        };

        let contents = self.surface.read_contents(&handle)?;
        mail.attachments = non_empty_items(&contents);
        self.store.save_mail(&mail)?;

        let attachments = mail.attachments.len();
        info!(viewer = %viewer, index, attachments, "Synced box into mail");

        if !state.boxes.retain_view_after_sync {
            state.active_views.remove(viewer);
        }
        if index != EDITMODE_INDEX
            && state.boxes.evict_on_close
            && !state.active_views.values().any(|&open| open == index)
        {
            state.attachment_boxes.remove(&index);
            debug!(index, "Evicted attachment box after close");
        }

        Ok(SyncOutcome::Saved { index, attachments })
    }

    // ── Eviction ────────────────────────────────────────────────

    /// Drop the attachment box of mail `index`, e.g. when the mail is deleted.
    ///
    /// Viewers whose active view pointed at it are forgotten. Items still
    /// in the box are not written anywhere.
    pub fn evict_attachment_box(&self, index: u32) -> bool {
        let mut state = self.lock();
        let removed = state.attachment_boxes.remove(&index).is_some();
        state.active_views.retain(|_, open| *open != index);
        if removed {
            info!(index, "Evicted attachment box");
        }
        removed
    }

    // ── Introspection ───────────────────────────────────────────

    /// Key of the box `viewer` last opened: `0` for their draft.
    pub fn active_view(&self, viewer: &ViewerId) -> Option<u32> {
        self.lock().active_views.get(viewer).copied()
    }

    pub fn attachment_box(&self, index: u32) -> Option<S::Handle> {
        self.lock()
            .attachment_boxes
            .get(&index)
            .map(|cached| cached.handle.clone())
    }

    pub fn attachment_box_count(&self) -> usize {
        self.lock().attachment_boxes.len()
    }

    pub fn editmode_box_count(&self) -> usize {
        self.lock().editmode_boxes.len()
    }

    /// Indices with a cached attachment box, ascending.
    pub fn open_attachment_indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.lock().attachment_boxes.keys().copied().collect();
        indices.sort_unstable();
        indices
    }
}
