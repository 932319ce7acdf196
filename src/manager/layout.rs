//! Box sizing and titles.

use crate::config::TitlesConfig;
use crate::i18n;
use crate::model::slots::ROW_SLOTS;

/// Longest title the host can display, in characters.
pub const MAX_TITLE_CHARS: usize = 32;

/// Cut `title` to [`MAX_TITLE_CHARS`] characters. Not word-aware.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Slots in an edit-mode box with `rows` rows.
pub fn editmode_box_size(rows: u32) -> usize {
    rows as usize * ROW_SLOTS
}

/// Slots needed to hold `count` attachments: whole rows, at least one.
pub fn attachment_box_size(count: usize) -> usize {
    count.div_ceil(ROW_SLOTS).max(1) * ROW_SLOTS
}

/// Title of an edit-mode box, already truncated.
pub fn editmode_box_title(titles: &TitlesConfig) -> String {
    match titles.editmode.as_deref() {
        Some(custom) => truncate_title(custom),
        None => truncate_title(i18n::editmode_box_title()),
    }
}

/// Title of the attachment box of mail `index`, already truncated.
pub fn attachment_box_title(titles: &TitlesConfig, index: u32) -> String {
    let title = match titles.attachment.as_deref() {
        Some(template) => i18n::fill_number(template, index),
        None => i18n::attachment_box_title(index),
    };
    truncate_title(&title)
}
