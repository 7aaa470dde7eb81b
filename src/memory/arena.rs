//! Call-scoped arena for foreign sub-blocks
//!
//! Owns every C-heap region handed to the client library during a single
//! connect attempt. Releases go through the ledger, so a pointer is freed
//! at most once and secret-bearing regions are zeroed before they are freed.

use std::alloc::{handle_alloc_error, Layout};
use std::mem::{align_of, size_of};
use std::ptr::{self, NonNull};

use zeroize::Zeroize;

use super::ForeignAllocator;

/// What a foreign region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationKind {
    ClientConn,
    SslConfig,
    SecurityParms,
    UserId,
    Password,
    CcdtUrl,
    BalanceParms,
}

impl AllocationKind {
    /// Regions that must be zero-filled before release
    pub fn is_secret(self) -> bool {
        matches!(self, AllocationKind::Password)
    }
}

#[derive(Debug)]
struct Allocation {
    ptr: NonNull<u8>,
    len: usize,
    kind: AllocationKind,
}

/// Ledger of the foreign allocations made for one connect attempt
pub struct CallArena<A: ForeignAllocator> {
    allocator: A,
    live: Vec<Allocation>,
    /// Total regions handed out
    allocations: usize,
    /// Total regions given back
    releases: usize,
}

impl<A: ForeignAllocator> CallArena<A> {
    /// Create an empty arena over `allocator`
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            live: Vec::new(),
            allocations: 0,
            releases: 0,
        }
    }

    /// Allocate `len` zeroed bytes. Memory exhaustion aborts the process.
    pub fn alloc_zeroed(&mut self, kind: AllocationKind, len: usize) -> NonNull<u8> {
        let raw = self.allocator.allocate_zeroed(len);
        let Some(ptr) = NonNull::new(raw) else {
            let layout = Layout::from_size_align(len.max(1), align_of::<u64>())
                .unwrap_or(Layout::new::<u64>());
            handle_alloc_error(layout)
        };

        self.live.push(Allocation { ptr, len, kind });
        self.allocations += 1;
        tracing::trace!(?kind, len, "allocated foreign sub-block");
        ptr
    }

    /// Allocate a region sized for `T` and move `value` into it
    pub fn alloc_struct<T>(&mut self, kind: AllocationKind, value: T) -> NonNull<T> {
        let ptr = self.alloc_zeroed(kind, size_of::<T>()).cast::<T>();
        debug_assert_eq!(ptr.as_ptr() as usize % align_of::<T>(), 0);
        unsafe { ptr.as_ptr().write(value) };
        ptr
    }

    /// Copy `s` into a fresh NUL-terminated region.
    /// Returns the region and the string length without the terminator.
    pub fn copy_str(&mut self, kind: AllocationKind, s: &str) -> (NonNull<u8>, usize) {
        let bytes = s.as_bytes();
        let ptr = self.alloc_zeroed(kind, bytes.len() + 1);
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len()) };
        (ptr, bytes.len())
    }

    /// Bytes of a live region
    pub fn region(&self, ptr: *const u8) -> Option<&[u8]> {
        self.find(ptr).map(|idx| {
            let entry = &self.live[idx];
            unsafe { std::slice::from_raw_parts(entry.ptr.as_ptr(), entry.len) }
        })
    }

    /// Mutable bytes of a live region
    pub fn region_mut(&mut self, ptr: *const u8) -> Option<&mut [u8]> {
        self.find(ptr).map(|idx| {
            let entry = &self.live[idx];
            unsafe { std::slice::from_raw_parts_mut(entry.ptr.as_ptr(), entry.len) }
        })
    }

    /// Whether `ptr` is a live region of this arena
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.find(ptr).is_some()
    }

    /// Release a live region. Returns false, and frees nothing, when `ptr`
    /// is null or not owned by this arena.
    pub fn release(&mut self, ptr: *const u8) -> bool {
        if ptr.is_null() {
            return false;
        }
        match self.find(ptr) {
            Some(idx) => {
                let entry = self.live.swap_remove(idx);
                self.release_entry(entry);
                true
            }
            None => {
                tracing::error!(?ptr, "refusing to release pointer not owned by call arena");
                false
            }
        }
    }

    /// Release every live region. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let leftovers: Vec<Allocation> = self.live.drain(..).collect();
        let count = leftovers.len();
        for entry in leftovers {
            self.release_entry(entry);
        }
        count
    }

    /// Regions allocated and not yet released
    pub fn outstanding(&self) -> usize {
        self.live.len()
    }

    /// Regions allocated over the arena's lifetime
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Regions released over the arena's lifetime
    pub fn releases(&self) -> usize {
        self.releases
    }

    fn find(&self, ptr: *const u8) -> Option<usize> {
        self.live
            .iter()
            .position(|entry| ptr::eq(entry.ptr.as_ptr(), ptr))
    }

    fn release_entry(&mut self, entry: Allocation) {
        if entry.kind.is_secret() {
            let bytes = unsafe { std::slice::from_raw_parts_mut(entry.ptr.as_ptr(), entry.len) };
            bytes.zeroize();
        }
        unsafe { self.allocator.release(entry.ptr, entry.len) };
        self.releases += 1;
        tracing::trace!(kind = ?entry.kind, len = entry.len, "released foreign sub-block");
    }
}

impl<A: ForeignAllocator> Drop for CallArena<A> {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            tracing::warn!(
                outstanding = self.live.len(),
                "call arena dropped with live sub-blocks; releasing"
            );
            self.release_all();
        }
    }
}
