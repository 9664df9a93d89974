use super::Element;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Where an injected element goes relative to its anchor node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Sibling immediately before the anchor
    Before,
    /// First child of the anchor
    Prepend,
    /// Last child of the anchor
    Append,
    /// Sibling immediately after the anchor
    After,
}

impl Placement {
    fn rank(self) -> u8 {
        match self {
            Self::Before => 0,
            Self::Prepend => 1,
            Self::Append => 2,
            Self::After => 3,
        }
    }
}

/// A resolved insertion point in the host page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// CSS-like description of the anchor node
    pub target: String,
    /// Document-order index used to keep injected nodes in page order
    pub position: usize,
    pub placement: Placement,
}

impl Anchor {
    pub fn new(target: impl Into<String>, position: usize, placement: Placement) -> Self {
        Self {
            target: target.into(),
            position,
            placement,
        }
    }

    pub fn sort_key(&self) -> (usize, u8) {
        (self.position, self.placement.rank())
    }
}

/// A live injected element
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    pub anchor: Anchor,
    pub element: Element,
    seq: u64,
}

impl Mount {
    pub fn slot(&self) -> &str {
        self.element.id.as_deref().unwrap_or_default()
    }
}

/// Ownership token for one slot in one detection cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLease {
    slot: String,
    generation: u64,
}

impl SlotLease {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Every element injected into one page instance, keyed by slot id.
///
/// Each slot carries a generation counter. `claim` bumps it and tears the
/// slot down, so any lease handed out earlier can no longer commit.
#[derive(Debug, Default)]
pub struct Surface {
    mounts: Mutex<Vec<Mount>>,
    generations: DashMap<String, u64>,
    seq: AtomicU64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle for `slot`: remove its element and invalidate older leases
    pub fn claim(&self, slot: &str) -> SlotLease {
        let generation = self.retire(slot);
        SlotLease {
            slot: slot.to_string(),
            generation,
        }
    }

    /// Remove the slot's element and invalidate every outstanding lease.
    /// Returns the new generation.
    pub fn retire(&self, slot: &str) -> u64 {
        let mut mounts = self.mounts.lock();
        let generation = {
            let mut entry = self.generations.entry(slot.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        mounts.retain(|m| m.slot() != slot);
        generation
    }

    pub fn is_current(&self, lease: &SlotLease) -> bool {
        self.generations
            .get(&lease.slot)
            .is_some_and(|g| *g == lease.generation)
    }

    /// Every slot ever claimed on this surface
    pub fn slots(&self) -> Vec<String> {
        self.generations.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Mount `element` for the lease's slot unless a newer cycle owns it
    pub fn commit(&self, lease: &SlotLease, anchor: Anchor, element: Element) -> bool {
        if element.id.as_deref() != Some(lease.slot.as_str()) {
            warn!(
                slot = %lease.slot,
                element_id = ?element.id,
                "Element id does not match its slot"
            );
            return false;
        }
        // Generations only move under the mounts lock
        let mut mounts = self.mounts.lock();
        if !self.is_current(lease) {
            debug!(
                slot = %lease.slot,
                generation = lease.generation,
                "Discarding stale render"
            );
            return false;
        }
        self.insert(&mut mounts, lease.slot.clone(), anchor, element);
        true
    }

    /// Remove the lease's element if the lease is still current
    pub fn release(&self, lease: &SlotLease) -> bool {
        let mut mounts = self.mounts.lock();
        self.is_current(lease) && remove(&mut mounts, &lease.slot)
    }

    /// Insert `element`, first removing any element with the same id
    pub fn mount(&self, anchor: Anchor, element: Element) {
        let Some(id) = element.id.clone() else {
            warn!(tag = %element.tag, "Refusing to mount an element without an id");
            return;
        };
        let mut mounts = self.mounts.lock();
        self.insert(&mut mounts, id, anchor, element);
    }

    /// Remove the element for `slot`. Returns whether one was live.
    pub fn teardown(&self, slot: &str) -> bool {
        remove(&mut self.mounts.lock(), slot)
    }

    fn insert(&self, mounts: &mut Vec<Mount>, id: String, anchor: Anchor, element: Element) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        mounts.retain(|m| m.slot() != id);
        mounts.push(Mount {
            anchor,
            element,
            seq,
        });
    }

    pub fn get(&self, slot: &str) -> Option<Element> {
        self.mounts
            .lock()
            .iter()
            .find(|m| m.slot() == slot)
            .map(|m| m.element.clone())
    }

    pub fn anchor_of(&self, slot: &str) -> Option<Anchor> {
        self.mounts
            .lock()
            .iter()
            .find(|m| m.slot() == slot)
            .map(|m| m.anchor.clone())
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.mounts.lock().iter().any(|m| m.slot() == slot)
    }

    /// Number of live elements carrying `id`
    pub fn count(&self, id: &str) -> usize {
        self.mounts.lock().iter().filter(|m| m.slot() == id).count()
    }

    pub fn len(&self) -> usize {
        self.mounts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.lock().is_empty()
    }

    /// Live elements in the order they appear in the page
    pub fn mounts(&self) -> Vec<Mount> {
        let mut mounts = self.mounts.lock().clone();
        mounts.sort_by_key(|m| (m.anchor.sort_key(), m.seq));
        mounts
    }

    /// Live elements carrying `class`, in page order
    pub fn with_class(&self, class: &str) -> Vec<Element> {
        self.mounts()
            .into_iter()
            .filter(|m| m.element.has_class(class))
            .map(|m| m.element)
            .collect()
    }
}

fn remove(mounts: &mut Vec<Mount>, slot: &str) -> bool {
    let before = mounts.len();
    mounts.retain(|m| m.slot() != slot);
    mounts.len() != before
}
