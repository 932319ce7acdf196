//! Fixed-size slot sets: the container primitive boxes are built from.

use super::item::ItemStack;

/// Slots per container row.
pub const ROW_SLOTS: usize = 9;

/// An ordered, fixed-size sequence of slots, each holding an item or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSet {
    title: String,
    slots: Vec<Option<ItemStack>>,
}

impl SlotSet {
    /// Create an empty slot set with `size` slots.
    pub fn new(size: usize, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slots: vec![None; size],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Place `item` into the first empty slot.
    ///
    /// Returns the item back when every slot is taken. Empty stacks are
    /// accepted and dropped.
    pub fn add_item(&mut self, item: ItemStack) -> Option<ItemStack> {
        if item.is_empty() {
            return None;
        }
        match self.slots.iter_mut().find(|slot| slot_is_empty(slot)) {
            Some(slot) => {
                *slot = Some(item);
                None
            }
            None => Some(item),
        }
    }

    /// Current contents in slot order.
    pub fn contents(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Overwrite a slot. Out-of-range slots are ignored and `item` is handed back.
    pub fn set_slot(&mut self, slot: usize, item: Option<ItemStack>) -> Option<ItemStack> {
        match self.slots.get_mut(slot) {
            Some(target) => std::mem::replace(target, item),
            None => item,
        }
    }

    /// Empty a slot, returning what it held.
    pub fn take_slot(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Items in slot order with empty slots skipped.
    pub fn non_empty_items(&self) -> Vec<ItemStack> {
        non_empty_items(&self.slots)
    }
}

fn slot_is_empty(slot: &Option<ItemStack>) -> bool {
    slot.as_ref().is_none_or(ItemStack::is_empty)
}

/// Filter a slot listing down to its real items, keeping slot order.
pub fn non_empty_items(slots: &[Option<ItemStack>]) -> Vec<ItemStack> {
    slots
        .iter()
        .flatten()
        .filter(|item| !item.is_empty())
        .cloned()
        .collect()
}
