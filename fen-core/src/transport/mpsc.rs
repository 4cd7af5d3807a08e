//! Bounded multi-producer/single-consumer ring buffer.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crossbeam::utils::CachePadded;

struct Slot<T> {
    occupied: AtomicBool,
    value: UnsafeCell<MaybeUninit<T>>,
}

/// Lock-free MPSC ring buffer of fixed capacity.
///
/// Producers reserve a slot with a fetch-add on `tail`, then publish the
/// payload by raising the slot's occupancy flag. The single consumer observes
/// occupancy with acquire ordering before reading and clears it with release
/// ordering after. Consequently the order seen by the consumer is the order
/// in which producers *published* their slots, which under contention may
/// differ from reservation order.
///
/// A producer whose reserved slot is still occupied from a previous lap
/// yields until the consumer frees it; the consumer itself never blocks: it
/// reports empty whenever the next slot has not been published yet, even if
/// later slots already have been.
pub struct MpscRing<T> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    slots: Box<[Slot<T>]>,
}

unsafe impl<T: Send> Send for MpscRing<T> {}
unsafe impl<T: Send> Sync for MpscRing<T> {}

impl<T> MpscRing<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        let slots = (0..capacity)
            .map(|_| Slot {
                occupied: AtomicBool::new(false),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            slots,
        }
    }

    /// Push an item, spinning (with `yield_now`) while the reserved slot is
    /// still occupied from a previous lap. Always succeeds eventually as long
    /// as the consumer keeps draining.
    pub fn push(&self, item: T) {
        let ticket = self.tail.fetch_add(1, Ordering::Acquire);
        let slot = &self.slots[ticket % self.slots.len()];

        while slot.occupied.load(Ordering::Acquire) {
            thread::yield_now();
        }

        unsafe {
            (*slot.value.get()).write(item);
        }
        slot.occupied.store(true, Ordering::Release);
    }

    /// Non-wedging push: rejects the item up front when the ring looks full
    /// instead of reserving a slot and spinning on it.
    ///
    /// The occupancy check is conservative (a concurrent pop may free space
    /// between the check and the reservation), but a `true` result never
    /// leaves the caller stuck behind a full ring.
    pub fn try_push(&self, item: T) -> Result<(), T> {
        if self.len() >= self.slots.len() {
            return Err(item);
        }
        self.push(item);
        Ok(())
    }

    /// Pop the item at the head slot, or `None` if that slot has not been
    /// published. Must only be called from the single consumer thread.
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        let slot = &self.slots[head % self.slots.len()];

        if !slot.occupied.load(Ordering::Acquire) {
            return None;
        }

        let item = unsafe { (*slot.value.get()).assume_init_read() };
        slot.occupied.store(false, Ordering::Release);
        // Single consumer: nobody else advances head.
        self.head.store(head + 1, Ordering::Relaxed);
        Some(item)
    }

    /// Approximate number of buffered items, including slots reserved but not
    /// yet published.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.saturating_sub(head)
    }

    /// Whether the head slot is unpublished (consumer's view of empty).
    pub fn is_empty(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        !self.slots[head % self.slots.len()]
            .occupied
            .load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Drop for MpscRing<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn push_pop_single_thread() {
        let ring = MpscRing::new(8);
        assert!(ring.is_empty());

        ring.push(1);
        ring.push(2);
        assert_eq!(ring.len(), 2);

        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn try_push_rejects_when_full() {
        let ring = MpscRing::new(2);
        ring.try_push(1).unwrap();
        ring.try_push(2).unwrap();
        assert_eq!(ring.try_push(3), Err(3));

        assert_eq!(ring.pop(), Some(1));
        ring.try_push(3).unwrap();
    }

    #[test]
    fn multi_producer_no_loss() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 10_000;

        let ring = Arc::new(MpscRing::new(1024));
        let mut handles = Vec::new();

        for p in 0..PRODUCERS {
            let ring = Arc::clone(&ring);
            handles.push(thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    ring.push(p * PER_PRODUCER + i);
                }
            }));
        }

        let mut seen = vec![false; PRODUCERS * PER_PRODUCER];
        let mut received = 0;
        while received < PRODUCERS * PER_PRODUCER {
            if let Some(v) = ring.pop() {
                assert!(!seen[v], "duplicate value {}", v);
                seen[v] = true;
                received += 1;
            } else {
                thread::yield_now();
            }
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn per_producer_order_is_preserved() {
        const PER_PRODUCER: u64 = 5_000;
        let ring = Arc::new(MpscRing::new(256));

        let producers: Vec<_> = (0..2u64)
            .map(|p| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        ring.push((p, i));
                    }
                })
            })
            .collect();

        let mut last = [None::<u64>; 2];
        let mut received = 0;
        while received < 2 * PER_PRODUCER {
            if let Some((p, i)) = ring.pop() {
                if let Some(prev) = last[p as usize] {
                    assert!(i > prev, "producer {} went backwards: {} after {}", p, i, prev);
                }
                last[p as usize] = Some(i);
                received += 1;
            } else {
                thread::yield_now();
            }
        }

        for producer in producers {
            producer.join().unwrap();
        }
    }

    #[test]
    fn drops_buffered_items() {
        let item = Arc::new(());
        {
            let ring = MpscRing::new(4);
            ring.push(Arc::clone(&item));
            assert_eq!(Arc::strong_count(&item), 2);
        }
        assert_eq!(Arc::strong_count(&item), 1);
    }
}
