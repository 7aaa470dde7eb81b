//! MQCNO marshaling
//!
//! Brackets a single connect call:
//! - `Encoder` turns `ConnectionOptions` into an `MQCNO` header plus the
//!   sub-blocks it points at, raising the header version as features are added
//! - `Decoder` drains output fields and releases every sub-block afterwards
//!
//! A `ConnectionBlock` owns the header and a `CallArena` holding every
//! sub-block. It never outlives the call it was built for; if it is dropped
//! without being decoded, the arena still releases (and scrubs) everything.

mod adapters;
mod collab;
mod decode;
mod encode;
mod version;

pub use collab::{ForeignImage, SubBlockCodec};
pub use decode::Decoder;
pub use encode::Encoder;
pub use version::{required_version, Feature};

use crate::capability::Capabilities;
use crate::config::DroppedFeaturePolicy;
use crate::ffi::{MqLong, Mqbno, Mqcno, Mqcsp};
use crate::memory::{CallArena, ForeignAllocator, SystemAllocator};

/// Foreign connection-options block for one connect call
pub struct ConnectionBlock<A: ForeignAllocator = SystemAllocator> {
    header: Box<Mqcno>,
    arena: CallArena<A>,
    capabilities: Capabilities,
    dropped: Vec<Feature>,
}

impl<A: ForeignAllocator> ConnectionBlock<A> {
    fn new(allocator: A, capabilities: Capabilities) -> Self {
        Self {
            header: Box::new(Mqcno::zeroed()),
            arena: CallArena::new(allocator),
            capabilities,
            dropped: Vec::new(),
        }
    }

    /// The `MQCNO` header
    pub fn header(&self) -> &Mqcno {
        &self.header
    }

    /// Pointer to pass to the connect call. Valid until the block is
    /// decoded or dropped.
    pub fn as_mut_ptr(&mut self) -> *mut Mqcno {
        &mut *self.header
    }

    /// Header structure version
    pub fn version(&self) -> MqLong {
        self.header.version
    }

    /// Capabilities the block was encoded against
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Requested features the client library level could not express
    pub fn dropped_features(&self) -> &[Feature] {
        &self.dropped
    }

    /// Sub-blocks allocated so far
    pub fn allocations(&self) -> usize {
        self.arena.allocations()
    }

    /// Sub-blocks not yet released
    pub fn outstanding_allocations(&self) -> usize {
        self.arena.outstanding()
    }

    /// Bytes of a sub-block owned by this block
    pub fn region(&self, ptr: *const u8) -> Option<&[u8]> {
        self.arena.region(ptr)
    }

    /// Security parameters sub-block, if wired in
    pub fn security_parms(&self) -> Option<&Mqcsp> {
        let ptr = self.header.security_parms_ptr;
        if ptr.is_null() || !self.arena.contains(ptr as *const u8) {
            return None;
        }
        Some(unsafe { &*ptr })
    }

    /// Balancing parameters sub-block, if wired in
    pub fn balance_parms(&self) -> Option<&Mqbno> {
        let ptr = self.header.balance_parms_ptr;
        if ptr.is_null() || !self.arena.contains(ptr as *const u8) {
            return None;
        }
        Some(unsafe { &*ptr })
    }

    /// CCDT URL text without its terminator, if wired in
    pub fn ccdt_url(&self) -> Option<&[u8]> {
        let len = usize::try_from(self.header.ccdt_url_length).unwrap_or(0);
        self.arena
            .region(self.header.ccdt_url_ptr)
            .map(|bytes| &bytes[..len.min(bytes.len())])
    }

    /// Application name field with its zero padding stripped
    pub fn appl_name(&self) -> &[u8] {
        let name = &self.header.appl_name;
        let end = name.iter().position(|b| *b == 0).unwrap_or(name.len());
        &name[..end]
    }

    fn drop_feature(&mut self, feature: Feature, policy: DroppedFeaturePolicy) {
        self.dropped.push(feature);
        match policy {
            DroppedFeaturePolicy::Warn => tracing::warn!(
                %feature,
                library_level = self.capabilities.max_version(),
                "client library cannot express requested feature; dropping it"
            ),
            DroppedFeaturePolicy::Silent => tracing::trace!(
                %feature,
                library_level = self.capabilities.max_version(),
                "dropping unsupported feature"
            ),
        }
    }
}

impl<A: ForeignAllocator> std::fmt::Debug for ConnectionBlock<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBlock")
            .field("version", &self.header.version)
            .field("options", &self.header.options)
            .field("outstanding", &self.arena.outstanding())
            .field("dropped", &self.dropped)
            .finish()
    }
}
