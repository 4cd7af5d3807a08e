//! Bounded single-producer/single-consumer ring buffer.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::utils::CachePadded;

/// Lock-free SPSC ring buffer of fixed capacity.
///
/// # Contract
///
/// At most one thread may call [`push`](Self::push) and at most one (possibly
/// different) thread may call [`pop`](Self::pop) at any given time. The type
/// is `Sync` so it can be shared behind an `Arc`; the single-producer /
/// single-consumer discipline is the caller's responsibility, exactly like a
/// splittable ring with its halves handed to two threads.
///
/// # Memory ordering
///
/// The producer writes the payload slot and then release-stores `tail`; the
/// consumer acquire-loads `tail` before reading the slot, so the payload is
/// always visible before the index advance. The consumer's `head` publish is
/// symmetric. `head` and `tail` live on separate cache lines to avoid false
/// sharing between the two threads.
pub struct SpscRing<T> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// The ring moves `T` values across threads; payload slots are only touched by
// the side that owns them per the head/tail protocol.
unsafe impl<T: Send> Send for SpscRing<T> {}
unsafe impl<T: Send> Sync for SpscRing<T> {}

impl<T> SpscRing<T> {
    /// Create a ring that holds up to `capacity` items.
    ///
    /// One extra slot is allocated internally so that a full ring is
    /// distinguishable from an empty one.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        let slots = (0..capacity + 1)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            slots,
        }
    }

    /// Push an item. Fails only when the ring is full, handing the item back.
    #[inline]
    pub fn push(&self, item: T) -> Result<(), T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = self.advance(tail);

        if next == self.head.load(Ordering::Acquire) {
            return Err(item);
        }

        unsafe {
            (*self.slots[tail].get()).write(item);
        }
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Pop the oldest item, or `None` when empty.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);

        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        let item = unsafe { (*self.slots[head].get()).assume_init_read() };
        self.head.store(self.advance(head), Ordering::Release);
        Some(item)
    }

    /// Number of items currently buffered.
    ///
    /// Computed from acquire loads of both indices; the value may be stale by
    /// the time the caller observes it, but is never out of `0..=capacity`.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if tail >= head {
            tail - head
        } else {
            self.slots.len() - head + tail
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Maximum number of items the ring can hold.
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }
}

impl<T> Drop for SpscRing<T> {
    fn drop(&mut self) {
        // Drain so initialized payloads run their destructors.
        while self.pop().is_some() {}
    }
}
