use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Single-producer / single-consumer ring of stereo i16 frames.
///
/// Sits between the scheduler (producer) and the audio callback thread
/// (consumer). Neither side ever blocks: a push into a full ring fails and
/// returns `false`, which is the scheduler's backpressure signal to idle
/// before retrying, and a pop from an empty ring returns `None` (the sink
/// plays silence on underrun).
pub struct SampleProducer {
    ring: Arc<Ring>,
}

#[derive(Clone)]
pub struct SampleConsumer {
    ring: Arc<Ring>,
}

struct Ring {
    // One slot is kept unused so head == tail always means empty.
    slots: Box<[UnsafeCell<MaybeUninit<(i16, i16)>>]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// The producer only writes slots[head] and the consumer only reads
// slots[tail]; head/tail ordering is enforced with acquire/release pairs.
unsafe impl Sync for Ring {}
unsafe impl Send for Ring {}

impl Ring {
    #[inline]
    fn wrap(&self, idx: usize) -> usize {
        if idx + 1 == self.slots.len() { 0 } else { idx + 1 }
    }

    fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            head - tail
        } else {
            self.slots.len() - tail + head
        }
    }
}

/// Create a queue holding up to `capacity_frames` stereo frames.
pub fn sample_queue(capacity_frames: usize) -> (SampleProducer, SampleConsumer) {
    let slots = capacity_frames.max(1) + 1;
    let mut buf = Vec::with_capacity(slots);
    buf.resize_with(slots, || UnsafeCell::new(MaybeUninit::uninit()));

    let ring = Arc::new(Ring {
        slots: buf.into_boxed_slice(),
        head: AtomicUsize::new(0),
        tail: AtomicUsize::new(0),
    });

    (
        SampleProducer {
            ring: Arc::clone(&ring),
        },
        SampleConsumer { ring },
    )
}

impl SampleProducer {
    /// Push one frame. Returns `false` without storing when the ring is
    /// full; the caller should yield and retry.
    #[inline]
    pub fn push_frame(&self, left: i16, right: i16) -> bool {
        let head = self.ring.head.load(Ordering::Relaxed);
        let next = self.ring.wrap(head);
        if next == self.ring.tail.load(Ordering::Acquire) {
            return false;
        }

        unsafe {
            (*self.ring.slots[head].get()).write((left, right));
        }
        self.ring.head.store(next, Ordering::Release);
        true
    }

    /// True when another `push_frame` would fail.
    #[inline]
    pub fn is_full(&self) -> bool {
        let head = self.ring.head.load(Ordering::Relaxed);
        self.ring.wrap(head) == self.ring.tail.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity_frames(&self) -> usize {
        self.ring.slots.len() - 1
    }
}

impl SampleConsumer {
    /// Pop the oldest frame, or `None` when the ring is empty.
    #[inline]
    pub fn pop_frame(&self) -> Option<(i16, i16)> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        if tail == self.ring.head.load(Ordering::Acquire) {
            return None;
        }

        let frame = unsafe { (*self.ring.slots[tail].get()).assume_init_read() };
        self.ring.tail.store(self.ring.wrap(tail), Ordering::Release);
        Some(frame)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity_frames(&self) -> usize {
        self.ring.slots.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_roundtrip() {
        let (tx, rx) = sample_queue(4);
        assert!(rx.pop_frame().is_none());
        assert!(tx.push_frame(1, -1));
        assert!(tx.push_frame(2, -2));
        assert_eq!(rx.pop_frame(), Some((1, -1)));
        assert_eq!(rx.pop_frame(), Some((2, -2)));
        assert!(rx.pop_frame().is_none());
    }

    #[test]
    fn full_ring_rejects_push() {
        let (tx, rx) = sample_queue(2);
        assert!(tx.push_frame(1, 1));
        assert!(tx.push_frame(2, 2));
        assert!(tx.is_full());
        assert!(!tx.push_frame(3, 3));
        assert_eq!(rx.pop_frame(), Some((1, 1)));
        assert!(!tx.is_full());
        assert!(tx.push_frame(3, 3));
    }

    #[test]
    fn wraparound_preserves_order() {
        let (tx, rx) = sample_queue(3);
        for round in 0..10i16 {
            assert!(tx.push_frame(round, -round));
            assert_eq!(rx.pop_frame(), Some((round, -round)));
        }
        assert!(rx.is_empty());
        assert_eq!(tx.capacity_frames(), 3);
    }
}
