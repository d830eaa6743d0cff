// SPDX-License-Identifier: Apache-2.0 OR MIT
// Lock-free single-producer single-consumer ring buffer

use crate::platform::CacheAligned;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free single-producer single-consumer ring buffer
///
/// The transport between the logging hot path and the consumer thread.
/// `CAP` must be a power of two >= 2; one slot stays unused so that
/// `write_idx == read_idx` (empty) is distinguishable from full without a
/// separate flag, leaving `CAP - 1` usable slots.
///
/// At most one thread may push and at most one thread may pop at any time.
/// This is a usage contract, not a runtime check.
///
/// Ordering contract: the producer's release store of `write_idx` pairs
/// with the consumer's acquire load, making every byte written into a slot
/// visible before the slot is observed occupied; symmetrically, the
/// consumer's release store of `read_idx` pairs with the producer's acquire
/// load, making a slot safe to overwrite only after the move out completed.
pub struct SpscRing<T, const CAP: usize> {
    entries: Box<[UnsafeCell<MaybeUninit<T>>]>,
    write_idx: CacheAligned<AtomicU64>,
    read_idx: CacheAligned<AtomicU64>,
}

// SAFETY: one producer and one consumer at a time is the usage contract;
// slot handoff is ordered by the release/acquire pairs on the indices, so
// no slot is ever accessed by both threads at once.
unsafe impl<T: Send, const CAP: usize> Sync for SpscRing<T, CAP> {}

impl<T, const CAP: usize> SpscRing<T, CAP> {
    const MASK: u64 = CAP as u64 - 1;

    /// CAP must be a power of two >= 2 so index wrap reduces to a bitmask.
    const CAPACITY_OK: () = assert!(
        CAP >= 2 && CAP.is_power_of_two(),
        "ring capacity must be a power of two >= 2"
    );

    /// Create an empty ring. No allocation happens after this point.
    pub fn new() -> Self {
        let _: () = Self::CAPACITY_OK;

        let entries: Vec<UnsafeCell<MaybeUninit<T>>> =
            (0..CAP).map(|_| UnsafeCell::new(MaybeUninit::uninit())).collect();

        Self {
            entries: entries.into_boxed_slice(),
            write_idx: CacheAligned(AtomicU64::new(0)),
            read_idx: CacheAligned(AtomicU64::new(0)),
        }
    }

    /// Attempt to push a value. Producer thread only.
    ///
    /// Returns false without touching any slot when the ring holds
    /// `CAP - 1` values; the rejected value is dropped by the caller's
    /// policy.
    #[inline]
    pub fn try_push(&self, value: T) -> bool {
        // Producer owns write_idx, relaxed is enough for its own load.
        let w = self.write_idx.0.load(Ordering::Relaxed);
        // Acquire pairs with the consumer's release: the slot we may reuse
        // has been fully moved out.
        let r = self.read_idx.0.load(Ordering::Acquire);

        if w.wrapping_sub(r) >= Self::MASK {
            return false;
        }

        let slot = self.entries[(w & Self::MASK) as usize].get();
        // SAFETY: occupancy < CAP - 1, so this slot is not reachable by the
        // consumer until the release store below publishes it.
        unsafe { (*slot).write(value) };

        self.write_idx.0.store(w.wrapping_add(1), Ordering::Release);
        true
    }

    /// Attempt to pop the oldest value. Consumer thread only.
    #[inline]
    pub fn try_pop(&self) -> Option<T> {
        // Acquire pairs with the producer's release: the slot's bytes are
        // visible before the index says it is occupied.
        let w = self.write_idx.0.load(Ordering::Acquire);
        let r = self.read_idx.0.load(Ordering::Relaxed);

        if r == w {
            return None;
        }

        let slot = self.entries[(r & Self::MASK) as usize].get();
        // SAFETY: r < w, so the producer published this slot and cannot
        // touch it again until the release store below frees it.
        let value = unsafe { (*slot).assume_init_read() };

        self.read_idx.0.store(r.wrapping_add(1), Ordering::Release);
        Some(value)
    }

    /// Approximate occupancy. Both loads are relaxed; the result may be
    /// stale and is advisory only.
    pub fn len(&self) -> usize {
        let w = self.write_idx.0.load(Ordering::Relaxed);
        let r = self.read_idx.0.load(Ordering::Relaxed);
        w.wrapping_sub(r) as usize
    }

    /// Advisory emptiness check.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advisory fullness check.
    pub fn is_full(&self) -> bool {
        self.len() >= CAP - 1
    }

    /// Total slots, including the reserved one.
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Usable slots: `CAP - 1`.
    pub const fn effective_capacity(&self) -> usize {
        CAP - 1
    }
}

impl<T, const CAP: usize> Default for SpscRing<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAP: usize> Drop for SpscRing<T, CAP> {
    fn drop(&mut self) {
        // Exclusive access here; destroy whatever is still in flight.
        let w = self.write_idx.0.load(Ordering::Relaxed);
        let mut i = self.read_idx.0.load(Ordering::Relaxed);
        while i != w {
            let slot = self.entries[(i & Self::MASK) as usize].get_mut();
            // SAFETY: slots in [read_idx, write_idx) hold initialized values.
            unsafe { slot.assume_init_drop() };
            i = i.wrapping_add(1);
        }
    }
}
