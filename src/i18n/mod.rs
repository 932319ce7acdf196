//! Internationalization (i18n) module.
//!
//! Provides the localized box titles and CLI strings.
//! English is the default language; Japanese is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Placeholder replaced by the mail index in attachment box titles.
pub const NUMBER_PLACEHOLDER: &str = "%number";

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Japanese
    Ja,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "ja", "en_US", "ja_JP").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from the `ATTACHBOX_LANG` / `LC_MESSAGES` / `LANG` environment variables.
pub fn detect_system_lang() -> Lang {
    ["ATTACHBOX_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $ja:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Ja => $ja,
            }
        }
    };
}

// ── Box titles ───────────────────────────────────────────────────

msg!(
    editmode_box_title,
    "Attachment Box (editing)",
    "\u{6dfb}\u{4ed8}\u{30dc}\u{30c3}\u{30af}\u{30b9}\u{ff08}\u{7de8}\u{96c6}\u{4e2d}\u{ff09}"
);
msg!(
    attachment_box_title_template,
    "Attachment Box of Mail #%number",
    "\u{30e1}\u{30fc}\u{30eb} #%number \u{306e}\u{6dfb}\u{4ed8}\u{30dc}\u{30c3}\u{30af}\u{30b9}"
);

/// Title of the attachment box for mail `index`.
pub fn attachment_box_title(index: u32) -> String {
    fill_number(attachment_box_title_template(), index)
}

/// Replace every `%number` in `template` with `index`.
pub fn fill_number(template: &str, index: u32) -> String {
    template.replace(NUMBER_PLACEHOLDER, &index.to_string())
}

// ── CLI output ───────────────────────────────────────────────────

msg!(msg_mail, "Mail", "\u{30e1}\u{30fc}\u{30eb}");
msg!(msg_attachments, "attachments", "\u{6dfb}\u{4ed8}");
msg!(msg_open_boxes, "Open attachment boxes", "\u{958b}\u{3044}\u{3066}\u{3044}\u{308b}\u{6dfb}\u{4ed8}\u{30dc}\u{30c3}\u{30af}\u{30b9}");
msg!(msg_config_saved, "Config written to", "\u{8a2d}\u{5b9a}\u{3092}\u{4fdd}\u{5b58}\u{3057}\u{307e}\u{3057}\u{305f}:");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_code() {
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("ja_JP.UTF-8"), Some(Lang::Ja));
        assert_eq!(Lang::from_code("EN-us"), Some(Lang::En));
        assert_eq!(Lang::from_code("fr"), None);
        assert_eq!(Lang::Ja.code(), "ja");
    }

    #[test]
    fn test_fill_number() {
        assert_eq!(fill_number("Mail %number", 42), "Mail 42");
        assert_eq!(fill_number("no placeholder", 1), "no placeholder");
        assert_eq!(fill_number("%number/%number", 7), "7/7");
    }

    #[test]
    fn test_default_titles_are_english() {
        // Tests never call set_lang, so the default applies.
        assert_eq!(editmode_box_title(), "Attachment Box (editing)");
        assert_eq!(attachment_box_title(7), "Attachment Box of Mail #7");
    }
}
