//! Core data model: viewers, items, slot sets, and mail records.

pub mod item;
pub mod mail;
pub mod slots;
pub mod viewer;

pub use item::ItemStack;
pub use mail::MailRecord;
pub use slots::SlotSet;
pub use viewer::ViewerId;
