//! Client library capabilities
//!
//! Which optional `MQCNO` fields the linked MQ client understands depends
//! on the level of the headers and library the crate is built against.
//! The level is resolved once (cargo features, optionally overridden by
//! configuration) and consulted by the encoder and decoder, so unsupported
//! fields degrade to no-ops instead of branching at compile time.

use once_cell::sync::Lazy;

use crate::cno::Feature;
use crate::ffi::{MqLong, MQCNO_VERSION_5, MQCNO_VERSION_8};

/// Lowest library level this crate supports: security parameters,
/// client channel and TLS configuration are always available.
pub const BASELINE_LEVEL: MqLong = MQCNO_VERSION_5;

/// Highest `MQCNO` version this crate can emit.
pub const MAX_LEVEL: MqLong = MQCNO_VERSION_8;

static DETECTED: Lazy<Capabilities> = Lazy::new(|| {
    let caps = Capabilities::detect();
    tracing::debug!(max_version = caps.max_version(), "resolved MQ client capabilities");
    caps
});

/// Capability table for one client library level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    max_version: MqLong,
}

impl Capabilities {
    /// Capabilities of a library whose newest `MQCNO` is `level`.
    /// Levels outside `BASELINE_LEVEL..=MAX_LEVEL` are clamped.
    pub const fn for_level(level: MqLong) -> Self {
        let max_version = if level < BASELINE_LEVEL {
            BASELINE_LEVEL
        } else if level > MAX_LEVEL {
            MAX_LEVEL
        } else {
            level
        };
        Self { max_version }
    }

    /// Level implied by the enabled cargo features
    pub fn detect() -> Self {
        let level = if cfg!(feature = "mq-9-2-4") {
            8
        } else if cfg!(feature = "mq-9-1-2") {
            7
        } else if cfg!(feature = "mq-9-0") {
            6
        } else {
            BASELINE_LEVEL
        };
        Self::for_level(level)
    }

    /// Process-wide capabilities, detected on first use
    pub fn global() -> Self {
        *DETECTED
    }

    /// Highest `MQCNO` version the library accepts
    pub fn max_version(&self) -> MqLong {
        self.max_version
    }

    /// Whether the library can express `feature`
    pub fn supports(&self, feature: Feature) -> bool {
        feature.min_version() <= self.max_version
    }

    /// Optional features this library level cannot express
    pub fn unsupported(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(move |f| !self.supports(*f))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_supports_core_sub_blocks() {
        let caps = Capabilities::for_level(BASELINE_LEVEL);
        assert!(caps.supports(Feature::ClientConn));
        assert!(caps.supports(Feature::SslConfig));
        assert!(caps.supports(Feature::SecurityParms));
        assert!(!caps.supports(Feature::CcdtUrl));
        assert!(!caps.supports(Feature::ApplName));
        assert!(!caps.supports(Feature::BalanceParms));
    }

    #[test]
    fn test_levels_are_cumulative() {
        let v7 = Capabilities::for_level(7);
        assert!(v7.supports(Feature::CcdtUrl));
        assert!(v7.supports(Feature::ApplName));
        assert!(!v7.supports(Feature::BalanceParms));
        assert_eq!(v7.unsupported().collect::<Vec<_>>(), vec![Feature::BalanceParms]);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Capabilities::for_level(1).max_version(), BASELINE_LEVEL);
        assert_eq!(Capabilities::for_level(42).max_version(), MAX_LEVEL);
    }

    #[test]
    fn test_detect_matches_features() {
        let caps = Capabilities::detect();
        assert_eq!(caps.supports(Feature::CcdtUrl), cfg!(feature = "mq-9-0"));
        assert_eq!(caps.supports(Feature::ApplName), cfg!(feature = "mq-9-1-2"));
        assert_eq!(caps.supports(Feature::BalanceParms), cfg!(feature = "mq-9-2-4"));
        assert_eq!(Capabilities::global(), caps);
    }
}
