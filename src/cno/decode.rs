//! Connection options decoder

use std::ptr;

use super::{adapters, ConnectionBlock, SubBlockCodec};
use crate::ffi::{MqPtr, MQCNO_VERSION_3, MQCNO_VERSION_5};
use crate::memory::{AllocationKind, ForeignAllocator};
use crate::types::ConnectionOptions;

/// Drains output fields from a used `MQCNO` block and releases it
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Copy the library's outputs into `opts` and release every sub-block
    /// the encoder attached.
    ///
    /// The password region is zeroed before it is freed. Each sub-block is
    /// released exactly once; the header pointers are nulled as they go.
    pub fn decode_and_release<A: ForeignAllocator>(
        &self,
        mut block: ConnectionBlock<A>,
        opts: &mut ConnectionOptions,
    ) {
        release_security_parms(&mut block);

        let cd_ptr = std::mem::replace(&mut block.header.client_conn_ptr, ptr::null_mut());
        drain_sub_block(&mut block, cd_ptr, &mut opts.client_conn, AllocationKind::ClientConn);

        let sco_ptr = std::mem::replace(&mut block.header.ssl_config_ptr, ptr::null_mut());
        drain_sub_block(&mut block, sco_ptr, &mut opts.ssl_config, AllocationKind::SslConfig);

        adapters::release_ccdt_url(&mut block);
        adapters::release_balance_parms(&mut block);

        let version = block.header.version;
        if version >= MQCNO_VERSION_3 {
            opts.conn_tag = block.header.conn_tag;
        }
        if version >= MQCNO_VERSION_5 {
            opts.connection_id = block.header.connection_id;
        }

        tracing::debug!(
            version,
            released = block.arena.releases(),
            outstanding = block.arena.outstanding(),
            connection_id = %opts.connection_id_hex(),
            "decoded connection options"
        );
    }
}

fn release_security_parms<A: ForeignAllocator>(block: &mut ConnectionBlock<A>) {
    let csp_ptr = std::mem::replace(&mut block.header.security_parms_ptr, ptr::null_mut());
    if csp_ptr.is_null() {
        return;
    }
    if !block.arena.contains(csp_ptr as *const u8) {
        tracing::error!(?csp_ptr, "security parameters not owned by this block");
        return;
    }

    // Owned by the arena and still live, so the struct is readable
    let csp = unsafe { &mut *csp_ptr };
    let user_ptr = std::mem::replace(&mut csp.user_id_ptr, ptr::null_mut());
    let password_ptr = std::mem::replace(&mut csp.password_ptr, ptr::null_mut());
    csp.user_id_length = 0;
    csp.password_length = 0;

    if !user_ptr.is_null() {
        block.arena.release(user_ptr as *const u8);
    }
    if !password_ptr.is_null() {
        block.arena.release(password_ptr as *const u8);
    }
    block.arena.release(csp_ptr as *const u8);
}

fn drain_sub_block<A: ForeignAllocator>(
    block: &mut ConnectionBlock<A>,
    foreign: MqPtr,
    host: &mut Option<Box<dyn SubBlockCodec>>,
    kind: AllocationKind,
) {
    if foreign.is_null() {
        return;
    }

    let foreign = foreign as *const u8;
    match (block.arena.region(foreign), host.as_mut()) {
        (Some(src), Some(codec)) => codec.decode(src),
        (Some(_), None) => {
            tracing::debug!(?kind, "no host value to drain sub-block into");
        }
        (None, _) => {
            tracing::error!(?kind, ?foreign, "sub-block not owned by this block");
            return;
        }
    }
    block.arena.release(foreign);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::capability::Capabilities;
    use crate::cno::{Encoder, ForeignImage};
    use crate::memory::TrackingAllocator;
    use crate::types::{BalancingParms, SecurityParms};

    fn encoder(level: i32) -> Encoder {
        Encoder::with_capabilities(Capabilities::for_level(level))
    }

    #[test]
    fn test_decode_releases_everything() {
        let tracker = TrackingAllocator::new();
        let mut opts = ConnectionOptions::new()
            .with_client_conn(ForeignImage::zeroed(16))
            .with_ssl_config(ForeignImage::zeroed(16))
            .with_security_parms(SecurityParms::user_password("app", "s3cret"))
            .with_ccdt_url("file:///ccdt.json")
            .with_appl_name("ledger")
            .with_balance_parms(BalancingParms::new());

        let block = encoder(8).encode_with(&opts, &tracker);
        assert_eq!(tracker.stats().live, 7);

        Decoder::new().decode_and_release(block, &mut opts);
        let stats = tracker.stats();
        assert_eq!(stats.allocations, 7);
        assert_eq!(stats.releases, 7);
        assert_eq!(stats.live, 0);
        assert_eq!(stats.invalid_releases, 0);
    }

    #[test]
    fn test_password_scrubbed_before_release() {
        let tracker = TrackingAllocator::new();
        let mut opts = ConnectionOptions::new()
            .with_security_parms(SecurityParms::user_password("app", "s3cret"));

        let block = encoder(5).encode_with(&opts, &tracker);
        let password_ptr = block.security_parms().unwrap().password_ptr;

        Decoder::new().decode_and_release(block, &mut opts);
        let region = tracker.released_at(password_ptr as *const u8).unwrap();
        assert_eq!(region.len, 7);
        assert!(region.is_zeroed());
        assert!(!tracker.leaked_bytes(b"s3cret"));
    }

    /// Records what the library left in its foreign block
    #[derive(Debug)]
    struct Recorder {
        len: usize,
        seen: Arc<Mutex<Vec<u8>>>,
    }

    impl SubBlockCodec for Recorder {
        fn foreign_len(&self) -> usize {
            self.len
        }

        fn encode(&self, dst: &mut [u8]) {
            dst[0] = 0x01;
        }

        fn decode(&mut self, src: &[u8]) {
            *self.seen.lock() = src.to_vec();
        }
    }

    #[test]
    fn test_client_conn_drained_back() {
        let tracker = TrackingAllocator::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut opts = ConnectionOptions::new().with_client_conn(Recorder {
            len: 8,
            seen: Arc::clone(&seen),
        });

        let block = encoder(5).encode_with(&opts, &tracker);
        let cd_ptr = block.header().client_conn_ptr as *mut u8;
        // What the library would write back
        unsafe { *cd_ptr.add(3) = 0x7f };

        Decoder::new().decode_and_release(block, &mut opts);
        assert_eq!(*seen.lock(), vec![0x01, 0, 0, 0x7f, 0, 0, 0, 0]);
        assert!(opts.client_conn.is_some());
        assert_eq!(tracker.stats().live, 0);
    }

    #[test]
    fn test_outputs_copied_by_version() {
        let tracker = TrackingAllocator::new();
        let mut opts = ConnectionOptions::new()
            .with_security_parms(SecurityParms::user_password("app", "pw"));

        let mut block = encoder(5).encode_with(&opts, &tracker);
        let cno = unsafe { &mut *block.as_mut_ptr() };
        cno.conn_tag[..3].copy_from_slice(b"TAG");
        cno.connection_id[..4].copy_from_slice(b"AMQC");

        Decoder::new().decode_and_release(block, &mut opts);
        assert_eq!(&opts.conn_tag[..3], b"TAG");
        assert_eq!(&opts.connection_id[..4], b"AMQC");
    }

    #[test]
    fn test_outputs_ignored_below_version() {
        let tracker = TrackingAllocator::new();
        let mut opts = ConnectionOptions::new();
        opts.connection_id[0] = 0x11;

        let mut block = encoder(8).encode_with(&opts, &tracker);
        assert_eq!(block.version(), 1);
        let cno = unsafe { &mut *block.as_mut_ptr() };
        cno.conn_tag[0] = b'X';
        cno.connection_id[0] = 0x22;

        Decoder::new().decode_and_release(block, &mut opts);
        assert_eq!(opts.conn_tag[0], 0);
        assert_eq!(opts.connection_id[0], 0x11);
    }

    #[test]
    fn test_dropped_features_leave_nothing_to_release() {
        let tracker = TrackingAllocator::new();
        let mut opts = ConnectionOptions::new()
            .with_ccdt_url("file:///ccdt.json")
            .with_balance_parms(BalancingParms::new());

        let block = encoder(5).encode_with(&opts, &tracker);
        assert_eq!(block.dropped_features().len(), 2);

        Decoder::new().decode_and_release(block, &mut opts);
        let stats = tracker.stats();
        assert_eq!(stats.allocations, 0);
        assert_eq!(stats.releases, 0);
        assert_eq!(stats.invalid_releases, 0);
    }
}
