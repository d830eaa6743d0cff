// SPDX-License-Identifier: Apache-2.0 OR MIT
// Platform primitives: cache-line geometry, spin hint, tick source, thread id

/// Cache line size for the compilation target.
///
/// Apple silicon prefetches adjacent 64-byte lines in pairs, so padding to
/// 128 bytes is needed there to keep the producer and consumer indices from
/// interfering; 64 bytes covers x86 and generic ARM.
#[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
pub const CACHE_LINE_SIZE: usize = 128;
#[cfg(not(all(target_arch = "aarch64", target_vendor = "apple")))]
pub const CACHE_LINE_SIZE: usize = 64;

/// Cache-aligned wrapper to prevent false sharing
#[cfg_attr(
    all(target_arch = "aarch64", target_vendor = "apple"),
    repr(align(128))
)]
#[cfg_attr(
    not(all(target_arch = "aarch64", target_vendor = "apple")),
    repr(align(64))
)]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Pipeline hint for spin-wait loops.
///
/// A memory-ordering no-op: it never changes program-visible state.
#[inline(always)]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Cheap monotonic tick with the highest resolution the architecture offers.
///
/// Calls on the same thread are non-decreasing. Cross-core skew can occur on
/// some systems; the consumer-side conversion clamps it out (see
/// [`TextFormatter`](crate::TextFormatter)).
#[inline(always)]
pub fn read_tick() -> u64 {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::x86_64::_rdtsc()
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        let value: u64;
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) value);
        value
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        use std::sync::OnceLock;
        use std::time::Instant;
        static START: OnceLock<Instant> = OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}

/// Stable identifier for the calling thread.
///
/// Distinct threads yield distinct values; no other meaning is attached.
/// The value is resolved once per thread and cached.
#[cfg(feature = "thread-id")]
#[inline]
pub fn current_thread_id() -> u64 {
    thread_local! {
        static TID: u64 = os_thread_id();
    }
    TID.with(|&tid| tid)
}

#[cfg(feature = "thread-id")]
fn os_thread_id() -> u64 {
    #[cfg(target_os = "linux")]
    {
        unsafe { libc::gettid() as u64 }
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_monotonic_on_one_thread() {
        let t0 = read_tick();
        let t1 = read_tick();
        assert!(t1 >= t0);
    }

    #[test]
    fn test_cache_aligned_alignment() {
        assert!(std::mem::align_of::<CacheAligned<u64>>() >= 64);
        assert_eq!(std::mem::align_of::<CacheAligned<u64>>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn test_cpu_relax_is_callable() {
        for _ in 0..16 {
            cpu_relax();
        }
    }

    #[cfg(feature = "thread-id")]
    #[test]
    fn test_thread_ids_differ_across_threads() {
        let here = current_thread_id();
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
        // Cached value is stable within a thread
        assert_eq!(here, current_thread_id());
    }
}
