//! Memory management for foreign sub-blocks
//!
//! Everything the MQ client library dereferences must live on the C heap
//! and must be released exactly once after the connect call returns:
//! - `ForeignAllocator`: the seam between the marshaling code and the heap
//! - `SystemAllocator`: `calloc`/`free` from libc
//! - `CallArena`: per-call ledger that owns every sub-block of one connect
//! - `TrackingAllocator`: instrumented allocator for leak and erasure checks

mod arena;
mod tracking;

pub use arena::{AllocationKind, CallArena};
pub use tracking::{AllocationStats, ReleasedRegion, TrackingAllocator};

use std::ptr::NonNull;

/// Heap used for foreign-owned sub-blocks
pub trait ForeignAllocator {
    /// Allocate `len` zero-filled bytes, suitably aligned for any MQI
    /// structure. Returns null when memory is exhausted.
    fn allocate_zeroed(&self, len: usize) -> *mut u8;

    /// Release a region obtained from `allocate_zeroed`.
    ///
    /// # Safety
    /// `ptr` must come from `allocate_zeroed` on this allocator with the
    /// same `len`, and must not have been released already.
    unsafe fn release(&self, ptr: NonNull<u8>, len: usize);
}

impl<A: ForeignAllocator + ?Sized> ForeignAllocator for &A {
    fn allocate_zeroed(&self, len: usize) -> *mut u8 {
        (**self).allocate_zeroed(len)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, len: usize) {
        (**self).release(ptr, len)
    }
}

/// The C heap (`calloc` / `free`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl ForeignAllocator for SystemAllocator {
    fn allocate_zeroed(&self, len: usize) -> *mut u8 {
        // calloc(0) may legally return null; always ask for at least a byte
        unsafe { libc::calloc(1, len.max(1)) as *mut u8 }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, _len: usize) {
        libc::free(ptr.as_ptr() as *mut libc::c_void);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_allocator_zeroes() {
        let alloc = SystemAllocator;
        let ptr = alloc.allocate_zeroed(64);
        let ptr = NonNull::new(ptr).unwrap();
        let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 64) };
        assert!(bytes.iter().all(|b| *b == 0));
        unsafe { alloc.release(ptr, 64) };
    }

    #[test]
    fn test_zero_length_allocation_is_not_null() {
        let alloc = SystemAllocator;
        let ptr = NonNull::new(alloc.allocate_zeroed(0)).unwrap();
        unsafe { alloc.release(ptr, 0) };
    }
}
