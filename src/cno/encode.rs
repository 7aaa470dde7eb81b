//! Connection options encoder

use super::adapters;
use super::version::{raise_version, required_version};
use super::{ConnectionBlock, Feature, SubBlockCodec};
use crate::capability::Capabilities;
use crate::config::{DroppedFeaturePolicy, MarshalConfig};
use crate::ffi::{to_mqlong, MqPtr, Mqcsp, MQCNO_STRUC_ID};
use crate::memory::{AllocationKind, ForeignAllocator, SystemAllocator};
use crate::types::{ConnectionOptions, SecurityParms};

/// Builds the `MQCNO` block for one connect call
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    capabilities: Capabilities,
    policy: DroppedFeaturePolicy,
}

impl Encoder {
    pub fn new(config: &MarshalConfig) -> Self {
        Self {
            capabilities: config.capabilities(),
            policy: config.dropped_features,
        }
    }

    /// Encoder for an explicit library level, dropping silently
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            policy: DroppedFeaturePolicy::Silent,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Encode `opts` with sub-blocks on the C heap
    pub fn encode(&self, opts: &ConnectionOptions) -> ConnectionBlock<SystemAllocator> {
        self.encode_with(opts, SystemAllocator)
    }

    /// Encode `opts` with sub-blocks from `allocator`
    pub fn encode_with<A: ForeignAllocator>(
        &self,
        opts: &ConnectionOptions,
        allocator: A,
    ) -> ConnectionBlock<A> {
        let mut block = ConnectionBlock::new(allocator, self.capabilities);

        let cno = &mut *block.header;
        cno.struc_id = MQCNO_STRUC_ID;
        cno.version = opts.version;
        cno.options = opts.options;
        // Output-only; the library fills them in
        cno.conn_tag.fill(0);
        cno.connection_id.fill(0);

        if let Some(cd) = &opts.client_conn {
            let cd_ptr = encode_sub_block(&mut block, AllocationKind::ClientConn, cd.as_ref());
            block.header.client_conn_offset = 0;
            block.header.client_conn_ptr = cd_ptr;
            raise_version(&mut block.header.version, Feature::ClientConn.min_version());
        }

        if let Some(sco) = &opts.ssl_config {
            let sco_ptr = encode_sub_block(&mut block, AllocationKind::SslConfig, sco.as_ref());
            block.header.ssl_config_offset = 0;
            block.header.ssl_config_ptr = sco_ptr;
            raise_version(&mut block.header.version, Feature::SslConfig.min_version());
        }

        if let Some(csp) = &opts.security_parms {
            encode_security_parms(&mut block, csp);
        }

        if let Some(url) = opts.ccdt_url() {
            adapters::set_ccdt_url(&mut block, url, self.policy);
        }

        if let Some(name) = opts.appl_name() {
            adapters::set_appl_name(&mut block, name, self.policy);
        }

        if let Some(bno) = &opts.balance_parms {
            adapters::set_balance_parms(&mut block, bno, self.policy);
        }

        debug_assert_eq!(
            block.version(),
            required_version(
                opts.version,
                opts.populated_features()
                    .into_iter()
                    .filter(|f| self.capabilities.supports(*f))
            )
        );
        tracing::debug!(
            version = block.version(),
            options = block.header.options,
            allocations = block.allocations(),
            dropped = ?block.dropped_features(),
            "encoded connection options"
        );
        block
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(&MarshalConfig::default())
    }
}

fn encode_sub_block<A: ForeignAllocator>(
    block: &mut ConnectionBlock<A>,
    kind: AllocationKind,
    codec: &dyn SubBlockCodec,
) -> MqPtr {
    let len = codec.foreign_len();
    let ptr = block.arena.alloc_zeroed(kind, len);
    if let Some(dst) = block.arena.region_mut(ptr.as_ptr()) {
        codec.encode(dst);
    }
    ptr.as_ptr().cast()
}

fn encode_security_parms<A: ForeignAllocator>(block: &mut ConnectionBlock<A>, csp: &SecurityParms) {
    let mut foreign = Mqcsp::new();
    foreign.authentication_type = csp.effective_authentication_type().as_mqlong();

    // Empty strings mean "not supplied": no pointer and zero length
    if !csp.user_id.is_empty() {
        let (user_ptr, len) = block.arena.copy_str(AllocationKind::UserId, &csp.user_id);
        foreign.user_id_ptr = user_ptr.as_ptr().cast();
        foreign.user_id_length = to_mqlong(len);
    }
    if !csp.password.is_empty() {
        let (password_ptr, len) = block.arena.copy_str(AllocationKind::Password, &csp.password);
        foreign.password_ptr = password_ptr.as_ptr().cast();
        foreign.password_length = to_mqlong(len);
    }

    let csp_ptr = block.arena.alloc_struct(AllocationKind::SecurityParms, foreign);
    let cno = &mut *block.header;
    cno.security_parms_offset = 0;
    cno.security_parms_ptr = csp_ptr.as_ptr();
    raise_version(&mut cno.version, Feature::SecurityParms.min_version());
}
