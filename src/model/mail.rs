//! Mail record as seen by the box manager.

use super::item::ItemStack;
use super::viewer::ViewerId;

/// Index reserved for "the viewer's own draft". Never a delivered mail.
pub const EDITMODE_INDEX: u32 = 0;

/// The slice of a mail record the box manager reads and mutates.
///
/// The record itself is owned by the mail store; the manager only replaces
/// `attachments` wholesale when a box is created and when it is synced.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MailRecord {
    /// Store-assigned index. `0` for drafts still being edited.
    pub index: u32,

    /// Who wrote the mail. Drafts are looked up by this.
    pub sender: ViewerId,

    /// `true` while the sender is still composing this mail.
    #[serde(default)]
    pub edit_mode: bool,

    /// Attached items, in slot order.
    #[serde(default)]
    pub attachments: Vec<ItemStack>,
}

impl MailRecord {
    /// A delivered mail carrying `attachments`.
    pub fn delivered(index: u32, sender: ViewerId, attachments: Vec<ItemStack>) -> Self {
        Self {
            index,
            sender,
            edit_mode: false,
            attachments,
        }
    }

    /// A draft being composed.
    pub fn draft(sender: ViewerId, attachments: Vec<ItemStack>) -> Self {
        Self {
            index: EDITMODE_INDEX,
            sender,
            edit_mode: true,
            attachments,
        }
    }

    /// Move the attachment list out of the record.
    ///
    /// Afterwards `self.attachments` is empty; the caller is the only holder
    /// of the items.
    pub fn take_attachments(&mut self) -> Vec<ItemStack> {
        std::mem::take(&mut self.attachments)
    }

    /// Key of the box that shows this mail: `0` for drafts, else the index.
    pub fn view_key(&self) -> u32 {
        if self.edit_mode {
            EDITMODE_INDEX
        } else {
            self.index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_attachments_empties_record() {
        let mut mail = MailRecord::delivered(4, ViewerId::new("bob"), vec![ItemStack::new("STONE", 1)]);
        let taken = mail.take_attachments();
        assert_eq!(taken, vec![ItemStack::new("STONE", 1)]);
        assert!(mail.attachments.is_empty());
    }

    #[test]
    fn test_view_key() {
        assert_eq!(MailRecord::delivered(9, ViewerId::new("bob"), Vec::new()).view_key(), 9);
        let mut draft = MailRecord::draft(ViewerId::new("bob"), Vec::new());
        draft.index = 12;
        assert_eq!(draft.view_key(), EDITMODE_INDEX);
    }
}
