//! mqconn-core
//!
//! Version-adaptive marshaling for the MQ connection-options structure
//! (`MQCNO`) and the sub-blocks hanging off it.
//!
//! # Key Features
//!
//! - **Version tiers**: the header version is raised only as far as the
//!   populated fields require, so older queue managers still accept it
//! - **Capability gating**: fields the linked client library cannot express
//!   are dropped instead of being wired in
//! - **Exactly-once release**: every sub-block lives in a per-call arena;
//!   the password is zeroed before it goes back to the C heap
//!
//! # Layout
//!
//! ```text
//! ┌──────────────── MQCNO (v1..v8) ────────────────┐
//! │ "CNO " │ Version │ Options                     │
//! │ ClientConnPtr ─────────────────► MQCD     (v2) │
//! │ ConnTag[128]                              (v3) │
//! │ SSLConfigPtr ──────────────────► MQSCO    (v4) │
//! │ ConnectionId[24]                               │
//! │ SecurityParmsPtr ──────────────► MQCSP    (v5) │
//! │                                   ├─► user id  │
//! │                                   └─► password │
//! │ CCDTUrlPtr / Length ───────────► url      (v6) │
//! │ ApplName[28]                              (v7) │
//! │ BalanceParmsPtr ───────────────► MQBNO    (v8) │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mqconn_core::{with_connection_block, ConnectionOptions, Encoder, SecurityParms, SystemAllocator};
//!
//! let encoder = Encoder::default();
//! let mut opts = ConnectionOptions::new()
//!     .with_security_parms(SecurityParms::user_password("app", "passw0rd"))
//!     .with_appl_name("payments");
//!
//! let version = with_connection_block(&encoder, &mut opts, SystemAllocator, |cno| {
//!     // MQCONNX(qmgr_name, cno, &mut hconn, &mut cc, &mut rc)
//!     unsafe { (*cno).version }
//! });
//! assert!(version >= 5);
//! ```

pub mod capability;
pub mod cno;
pub mod config;
pub mod error;
pub mod ffi;
pub mod memory;
pub mod types;

pub use capability::Capabilities;
pub use cno::{
    required_version, ConnectionBlock, Decoder, Encoder, Feature, ForeignImage, SubBlockCodec,
};
pub use config::{DroppedFeaturePolicy, MarshalConfig};
pub use error::{CnoError, Result};
pub use ffi::{Mqbno, Mqcno, Mqcsp};
pub use memory::{ForeignAllocator, SystemAllocator, TrackingAllocator};
pub use types::{cno_options, AuthenticationType, BalancingParms, ConnectionOptions, SecurityParms};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encode `opts`, run `call` with the header, then decode back into `opts`.
///
/// The decoder runs whatever `call` returns; its result is passed through
/// untouched. If `call` unwinds, the block's arena still releases (and
/// scrubs) every sub-block.
pub fn with_connection_block<A, F, R>(
    encoder: &Encoder,
    opts: &mut ConnectionOptions,
    allocator: A,
    call: F,
) -> R
where
    A: ForeignAllocator,
    F: FnOnce(*mut Mqcno) -> R,
{
    let mut block = encoder.encode_with(opts, allocator);
    let result = call(block.as_mut_ptr());
    Decoder::new().decode_and_release(block, opts);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_passes_result_through() {
        let tracker = TrackingAllocator::new();
        let encoder = Encoder::with_capabilities(Capabilities::for_level(8));
        let mut opts = ConnectionOptions::new()
            .with_security_parms(SecurityParms::user_password("app", "pw"))
            .with_balance_parms(BalancingParms::new());

        let rc = with_connection_block(&encoder, &mut opts, &tracker, |cno| {
            let cno = unsafe { &mut *cno };
            assert_eq!(cno.version, 8);
            cno.connection_id[0] = 0x41;
            2035
        });

        assert_eq!(rc, 2035);
        assert_eq!(opts.connection_id[0], 0x41);
        assert_eq!(tracker.stats().live, 0);
    }

    #[test]
    fn test_bracket_releases_on_panic() {
        let tracker = TrackingAllocator::new();
        let encoder = Encoder::with_capabilities(Capabilities::for_level(8));
        let mut opts =
            ConnectionOptions::new().with_security_parms(SecurityParms::user_password("app", "hunter2"));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_connection_block(&encoder, &mut opts, &tracker, |_| -> i32 { panic!("native call failed") })
        }));

        assert!(outcome.is_err());
        let stats = tracker.stats();
        assert_eq!(stats.allocations, 3);
        assert_eq!(stats.releases, 3);
        assert!(!tracker.leaked_bytes(b"hunter2"));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
