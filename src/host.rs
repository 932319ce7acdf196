//! Host display surface: where containers are created and shown.
//!
//! The box manager never renders anything itself. It asks a
//! [`DisplaySurface`] for containers, fills them, and reads them back.
//! [`MemorySurface`] is an in-process implementation used by the CLI,
//! tests and benches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::HostError;
use crate::model::{ItemStack, SlotSet, ViewerId};

/// Metadata key the host stores the open box title under for a viewer.
pub const BOX_META_KEY: &str = "undine_boxinv";

/// Capabilities the box manager needs from the host.
pub trait DisplaySurface {
    /// Reference to a live container. Cloning yields the same container.
    type Handle: Clone;

    /// Create an empty container with `size` slots.
    fn create_container(&self, size: usize, title: &str) -> Result<Self::Handle, HostError>;

    /// Put `item` into the first free slot. Returns the item if it did not fit.
    fn add_item(&self, handle: &Self::Handle, item: ItemStack)
        -> Result<Option<ItemStack>, HostError>;

    /// Show the container to `viewer`.
    fn present(&self, handle: &Self::Handle, viewer: &ViewerId) -> Result<(), HostError>;

    /// Snapshot of the container's slots, in slot order.
    fn read_contents(&self, handle: &Self::Handle) -> Result<Vec<Option<ItemStack>>, HostError>;

    /// Record which box title `viewer` has open, so close events can be matched.
    fn bind_viewer(&self, viewer: &ViewerId, title: &str);
}

/// Shared handle to a [`MemorySurface`] container.
#[derive(Debug, Clone)]
pub struct MemoryHandle(Arc<Mutex<SlotSet>>);

impl MemoryHandle {
    /// Lock the underlying slot set. Used to simulate a viewer moving items.
    pub fn lock(&self) -> MutexGuard<'_, SlotSet> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `true` when both handles refer to the same container.
    pub fn same_container(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for MemoryHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_container(other)
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    showing: HashMap<ViewerId, MemoryHandle>,
    metadata: HashMap<ViewerId, String>,
    created: usize,
    fail_create: bool,
    fail_present: bool,
}

/// In-memory display surface.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The container most recently presented to `viewer`.
    pub fn showing(&self, viewer: &ViewerId) -> Option<MemoryHandle> {
        self.state().showing.get(viewer).cloned()
    }

    /// Title bound to `viewer` under [`BOX_META_KEY`].
    pub fn bound_title(&self, viewer: &ViewerId) -> Option<String> {
        self.state().metadata.get(viewer).cloned()
    }

    /// The viewer closes whatever they were looking at.
    pub fn close(&self, viewer: &ViewerId) -> Option<MemoryHandle> {
        let mut state = self.state();
        state.metadata.remove(viewer);
        state.showing.remove(viewer)
    }

    /// Number of containers created so far.
    pub fn created_count(&self) -> usize {
        self.state().created
    }

    /// Make subsequent `create_container` calls fail.
    pub fn set_fail_create(&self, fail: bool) {
        self.state().fail_create = fail;
    }

    /// Make subsequent `present` calls fail.
    pub fn set_fail_present(&self, fail: bool) {
        self.state().fail_present = fail;
    }
}

impl DisplaySurface for MemorySurface {
    type Handle = MemoryHandle;

    fn create_container(&self, size: usize, title: &str) -> Result<MemoryHandle, HostError> {
        let mut state = self.state();
        if state.fail_create {
            return Err(HostError::CreateFailed {
                size,
                title: title.to_string(),
                reason: "surface unavailable".to_string(),
            });
        }
        state.created += 1;
        Ok(MemoryHandle(Arc::new(Mutex::new(SlotSet::new(size, title)))))
    }

    fn add_item(
        &self,
        handle: &MemoryHandle,
        item: ItemStack,
    ) -> Result<Option<ItemStack>, HostError> {
        Ok(handle.lock().add_item(item))
    }

    fn present(&self, handle: &MemoryHandle, viewer: &ViewerId) -> Result<(), HostError> {
        let mut state = self.state();
        if state.fail_present {
            return Err(HostError::PresentFailed {
                viewer: viewer.to_string(),
                reason: "viewer offline".to_string(),
            });
        }
        state.showing.insert(viewer.clone(), handle.clone());
        Ok(())
    }

    fn read_contents(&self, handle: &MemoryHandle) -> Result<Vec<Option<ItemStack>>, HostError> {
        Ok(handle.lock().contents().to_vec())
    }

    fn bind_viewer(&self, viewer: &ViewerId, title: &str) {
        tracing::trace!(viewer = %viewer, key = BOX_META_KEY, title, "Bound box to viewer");
        self.state()
            .metadata
            .insert(viewer.clone(), title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_and_close() {
        let surface = MemorySurface::new();
        let viewer = ViewerId::new("alice");
        let handle = surface.create_container(9, "box").unwrap();
        surface.present(&handle, &viewer).unwrap();
        surface.bind_viewer(&viewer, "box");

        assert!(surface.showing(&viewer).unwrap().same_container(&handle));
        assert_eq!(surface.bound_title(&viewer).as_deref(), Some("box"));

        surface.close(&viewer);
        assert!(surface.showing(&viewer).is_none());
        assert!(surface.bound_title(&viewer).is_none());
    }

    #[test]
    fn test_failure_switches() {
        let surface = MemorySurface::new();
        surface.set_fail_create(true);
        assert!(matches!(
            surface.create_container(9, "box"),
            Err(HostError::CreateFailed { size: 9, .. })
        ));
        surface.set_fail_create(false);
        let handle = surface.create_container(9, "box").unwrap();
        surface.set_fail_present(true);
        assert!(surface.present(&handle, &ViewerId::new("bob")).is_err());
        assert_eq!(surface.created_count(), 1);
    }

    #[test]
    fn test_clones_share_contents() {
        let surface = MemorySurface::new();
        let handle = surface.create_container(2, "box").unwrap();
        let other = handle.clone();
        surface
            .add_item(&handle, ItemStack::new("APPLE", 2))
            .unwrap();
        assert_eq!(
            surface.read_contents(&other).unwrap(),
            vec![Some(ItemStack::new("APPLE", 2)), None]
        );
    }
}
