//! Fixed-capacity slot-arena object pool.
//!
//! All slots are allocated up front; `acquire` claims one with a CAS on its
//! occupancy flag, so the hot path never touches the allocator. Slot contents
//! persist across acquisitions; callers that need a clean value must reset
//! it themselves.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam::utils::CachePadded;

struct PoolSlot<T> {
    occupied: AtomicBool,
    value: UnsafeCell<T>,
}

/// Pre-allocated pool of `capacity` slots with atomic occupancy flags.
///
/// `acquire` sweeps at most `capacity` slots starting from a rotating hint
/// and returns the first one it can claim, so repeated acquisitions spread
/// across the arena instead of hammering slot 0.
pub struct SlotPool<T> {
    slots: Box<[PoolSlot<T>]>,
    hint: CachePadded<AtomicUsize>,
}

unsafe impl<T: Send> Send for SlotPool<T> {}
unsafe impl<T: Send> Sync for SlotPool<T> {}

impl<T: Default> SlotPool<T> {
    /// Allocate a pool of `capacity` default-initialized slots.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be non-zero");
        let slots = (0..capacity)
            .map(|_| PoolSlot {
                occupied: AtomicBool::new(false),
                value: UnsafeCell::new(T::default()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            hint: CachePadded::new(AtomicUsize::new(0)),
        }
    }
}

impl<T> SlotPool<T> {
    /// Claim a free slot, or `None` when every slot is occupied.
    ///
    /// The returned guard releases the slot when dropped.
    pub fn acquire(&self) -> Option<PoolGuard<'_, T>> {
        for _ in 0..self.slots.len() {
            let index = self.hint.fetch_add(1, Ordering::Relaxed) % self.slots.len();
            let slot = &self.slots[index];

            if slot
                .occupied
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return Some(PoolGuard { slot });
            }
        }
        None
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Approximate number of currently claimed slots. Snapshot only; not
    /// suitable for control flow.
    pub fn allocated_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.occupied.load(Ordering::Acquire))
            .count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.allocated_count() == self.slots.len()
    }
}

/// Exclusive handle to a claimed pool slot.
///
/// Dereferences to the slot value; dropping the guard releases the slot back
/// to the pool. Holding the guard is the proof of occupancy, so a release can
/// never target a slot outside the arena.
pub struct PoolGuard<'a, T> {
    slot: &'a PoolSlot<T>,
}

unsafe impl<T: Send> Send for PoolGuard<'_, T> {}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Exclusive: the occupancy flag was claimed by this guard.
        unsafe { &*self.slot.value.get() }
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.slot.value.get() }
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        self.slot.occupied.store(false, Ordering::Release);
    }
}
