//! Instrumented allocator
//!
//! Wraps the C heap and keeps a record of every allocation and release,
//! including a copy of each region's bytes at the moment it was freed.
//! Used to prove that a connect attempt leaks nothing, frees nothing twice,
//! and never hands credential bytes back to the heap.

use std::collections::HashMap;
use std::ptr::NonNull;

use parking_lot::Mutex;

use super::{ForeignAllocator, SystemAllocator};

/// Counters observed by a `TrackingAllocator`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    pub allocations: usize,
    pub releases: usize,
    /// Allocated and not yet released
    pub live: usize,
    /// Releases of pointers that were never allocated or already freed
    pub invalid_releases: usize,
}

/// Snapshot of a region taken just before it was freed
#[derive(Debug, Clone)]
pub struct ReleasedRegion {
    pub addr: usize,
    pub len: usize,
    pub bytes: Vec<u8>,
}

impl ReleasedRegion {
    /// True when every byte was zero at release time
    pub fn is_zeroed(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// True when `needle` appears anywhere in the released bytes
    pub fn contains(&self, needle: &[u8]) -> bool {
        !needle.is_empty() && self.bytes.windows(needle.len()).any(|w| w == needle)
    }
}

#[derive(Default)]
struct TrackingState {
    live: HashMap<usize, usize>,
    stats: AllocationStats,
    released: Vec<ReleasedRegion>,
}

/// Allocator that records every allocation and release
#[derive(Default)]
pub struct TrackingAllocator {
    inner: SystemAllocator,
    state: Mutex<TrackingState>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters
    pub fn stats(&self) -> AllocationStats {
        let state = self.state.lock();
        AllocationStats {
            live: state.live.len(),
            ..state.stats
        }
    }

    /// Every region released so far, in release order
    pub fn released(&self) -> Vec<ReleasedRegion> {
        self.state.lock().released.clone()
    }

    /// The most recent release of the region at `ptr`
    pub fn released_at<T>(&self, ptr: *const T) -> Option<ReleasedRegion> {
        let addr = ptr as usize;
        self.state
            .lock()
            .released
            .iter()
            .rev()
            .find(|r| r.addr == addr)
            .cloned()
    }

    /// True when any released region still held `needle`
    pub fn leaked_bytes(&self, needle: &[u8]) -> bool {
        self.state.lock().released.iter().any(|r| r.contains(needle))
    }
}

impl ForeignAllocator for TrackingAllocator {
    fn allocate_zeroed(&self, len: usize) -> *mut u8 {
        let ptr = self.inner.allocate_zeroed(len);
        if !ptr.is_null() {
            let mut state = self.state.lock();
            state.live.insert(ptr as usize, len);
            state.stats.allocations += 1;
        }
        ptr
    }

    unsafe fn release(&self, ptr: NonNull<u8>, len: usize) {
        let addr = ptr.as_ptr() as usize;
        let mut state = self.state.lock();
        match state.live.remove(&addr) {
            Some(allocated_len) => {
                debug_assert_eq!(allocated_len, len, "release length differs from allocation");
                let bytes = std::slice::from_raw_parts(ptr.as_ptr(), allocated_len).to_vec();
                state.released.push(ReleasedRegion {
                    addr,
                    len: allocated_len,
                    bytes,
                });
                state.stats.releases += 1;
                drop(state);
                self.inner.release(ptr, allocated_len);
            }
            None => {
                // Never free memory we did not hand out
                state.stats.invalid_releases += 1;
            }
        }
    }
}
