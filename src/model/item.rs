//! Item stacks held in box slots and mail attachments.

/// Item kind the host uses for "nothing in this slot".
pub const AIR: &str = "AIR";

/// A stack of identical items.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemStack {
    /// Item kind, e.g. `"DIAMOND"`.
    pub kind: String,

    /// Number of items in the stack.
    pub amount: u32,
}

impl ItemStack {
    pub fn new(kind: impl Into<String>, amount: u32) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }

    /// `true` for air or a zero-sized stack. Such stacks count as an empty slot.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.kind.eq_ignore_ascii_case(AIR)
    }
}

impl std::fmt::Display for ItemStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{}", self.kind, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stacks() {
        assert!(ItemStack::new("AIR", 1).is_empty());
        assert!(ItemStack::new("air", 5).is_empty());
        assert!(ItemStack::new("STONE", 0).is_empty());
        assert!(!ItemStack::new("STONE", 1).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemStack::new("DIAMOND", 3).to_string(), "DIAMOND x3");
    }
}
