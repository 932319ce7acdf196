//! Scripted box sessions.
//!
//! A script seeds an in-memory store with mails and drafts, then drives a
//! [`BoxManager`] through opens, slot edits, closes and evictions. Used by
//! the `replay` CLI command to inspect how attachments move.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::host::MemorySurface;
use crate::manager::{BoxManager, SyncOutcome};
use crate::model::{ItemStack, MailRecord, ViewerId};
use crate::store::{MailStore, MemoryMailStore};

/// A replayable session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Delivered mails present before the first step.
    pub mails: Vec<MailRecord>,
    /// Drafts present before the first step, keyed by their sender.
    pub drafts: Vec<MailRecord>,
    pub steps: Vec<Step>,
}

/// One thing a viewer or the mail system does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Open the attachments of delivered mail `mail`.
    Open { viewer: ViewerId, mail: u32 },
    /// Open the viewer's own draft.
    OpenDraft { viewer: ViewerId },
    /// Take the item out of `slot` of the box the viewer is looking at.
    Take { viewer: ViewerId, slot: usize },
    /// Put `item` into `slot` of the box the viewer is looking at.
    Put {
        viewer: ViewerId,
        slot: usize,
        item: ItemStack,
    },
    /// The viewer closes the box: sync it back.
    Close { viewer: ViewerId },
    /// Discard the viewer's edit-mode box.
    ClearDraft { viewer: ViewerId },
    /// Delete mail `mail` and evict its box.
    Delete { mail: u32 },
}

/// What happened at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepResult {
    Opened { title: String, size: usize },
    Moved { item: Option<ItemStack> },
    Synced(SyncOutcome),
    Cleared { existed: bool },
    Deleted { existed: bool },
    Ignored { reason: String },
    Failed { error: String },
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepResult>,
    pub mails: Vec<MailRecord>,
    pub drafts: Vec<MailRecord>,
    pub open_boxes: Vec<u32>,
}

/// Read a script from a JSON file.
pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Run `script` against a fresh in-memory surface and store.
pub fn run_script(script: &Script, config: &Config) -> ReplayReport {
    let store = MemoryMailStore::new();
    for mail in &script.mails {
        store.insert(mail.clone());
    }
    for draft in &script.drafts {
        let mut draft = draft.clone();
        draft.edit_mode = true;
        store.set_draft(draft);
    }

    let manager = BoxManager::new(MemorySurface::new(), store, config);
    let steps = script
        .steps
        .iter()
        .map(|step| run_step(&manager, step))
        .collect();

    ReplayReport {
        steps,
        mails: manager.store().mails(),
        drafts: manager
            .store()
            .drafts()
            .into_iter()
            .map(|(_, draft)| draft)
            .collect(),
        open_boxes: manager.open_attachment_indices(),
    }
}

fn run_step(manager: &BoxManager<MemorySurface, MemoryMailStore>, step: &Step) -> StepResult {
    match step {
        Step::Open { viewer, mail } => match manager.store().get_mail(*mail) {
            Ok(Some(mut record)) => open(manager, viewer, &mut record),
            Ok(None) => ignored(format!("no mail #{mail}")),
            Err(e) => failed(e),
        },
        Step::OpenDraft { viewer } => match manager.store().get_editmode_mail(viewer) {
            Ok(Some(mut record)) => open(manager, viewer, &mut record),
            Ok(None) => ignored(format!("{viewer} has no draft")),
            Err(e) => failed(e),
        },
        Step::Take { viewer, slot } => match manager.surface().showing(viewer) {
            Some(handle) => StepResult::Moved {
                item: handle.lock().take_slot(*slot),
            },
            None => ignored(format!("{viewer} has no box open")),
        },
        Step::Put { viewer, slot, item } => match manager.surface().showing(viewer) {
            Some(handle) => {
                let displaced = handle.lock().set_slot(*slot, Some(item.clone()));
                StepResult::Moved { item: displaced }
            }
            None => ignored(format!("{viewer} has no box open")),
        },
        Step::Close { viewer } => {
            let result = match manager.sync_attach_box(viewer) {
                Ok(outcome) => StepResult::Synced(outcome),
                Err(e) => failed(e),
            };
            manager.surface().close(viewer);
            result
        }
        Step::ClearDraft { viewer } => StepResult::Cleared {
            existed: manager.clear_editmode_box(viewer),
        },
        Step::Delete { mail } => {
            let existed = manager.store().remove(*mail).is_some();
            manager.evict_attachment_box(*mail);
            StepResult::Deleted { existed }
        }
    }
}

fn open(
    manager: &BoxManager<MemorySurface, MemoryMailStore>,
    viewer: &ViewerId,
    mail: &mut MailRecord,
) -> StepResult {
    match manager.display_attach_box(viewer, mail) {
        Ok(handle) => {
            let slots = handle.lock();
            StepResult::Opened {
                title: slots.title().to_string(),
                size: slots.size(),
            }
        }
        Err(e) => failed(e),
    }
}

fn ignored(reason: String) -> StepResult {
    warn!(%reason, "Ignoring replay step");
    StepResult::Ignored { reason }
}

fn failed(error: impl std::fmt::Display) -> StepResult {
    StepResult::Failed {
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "mails": [
            {"index": 7, "sender": "bob", "attachments": [
                {"kind": "APPLE", "amount": 1},
                {"kind": "BREAD", "amount": 2},
                {"kind": "COAL", "amount": 3}
            ]}
        ],
        "drafts": [
            {"index": 0, "sender": "alice"}
        ],
        "steps": [
            {"action": "open", "viewer": "alice", "mail": 7},
            {"action": "take", "viewer": "alice", "slot": 1},
            {"action": "close", "viewer": "alice"},
            {"action": "open_draft", "viewer": "alice"},
            {"action": "put", "viewer": "alice", "slot": 4, "item": {"kind": "BREAD", "amount": 2}},
            {"action": "close", "viewer": "alice"},
            {"action": "take", "viewer": "alice", "slot": 0}
        ]
    }"#;

    #[test]
    fn test_replay_moves_items_between_mail_and_draft() {
        let script: Script = serde_json::from_str(SCRIPT).expect("parse script");
        let report = run_script(&script, &Config::default());

        assert_eq!(
            report.steps[0],
            StepResult::Opened {
                title: "Attachment Box of Mail #7".to_string(),
                size: 9
            }
        );
        assert_eq!(
            report.steps[1],
            StepResult::Moved {
                item: Some(ItemStack::new("BREAD", 2))
            }
        );
        assert_eq!(
            report.steps[2],
            StepResult::Synced(SyncOutcome::Saved {
                index: 7,
                attachments: 2
            })
        );
        assert!(matches!(report.steps[6], StepResult::Ignored { .. }));

        assert_eq!(
            report.mails[0].attachments,
            vec![ItemStack::new("APPLE", 1), ItemStack::new("COAL", 3)]
        );
        assert_eq!(report.drafts[0].attachments, vec![ItemStack::new("BREAD", 2)]);
        assert!(report.open_boxes.is_empty());
    }

    #[test]
    fn test_replay_open_missing_mail_is_ignored() {
        let script = Script {
            steps: vec![Step::Open {
                viewer: ViewerId::new("alice"),
                mail: 3,
            }],
            ..Script::default()
        };
        let report = run_script(&script, &Config::default());
        assert!(matches!(report.steps[0], StepResult::Ignored { .. }));
    }
}
