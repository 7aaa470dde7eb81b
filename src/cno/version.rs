//! Structure version selection
//!
//! `MQCNO` versions are strictly additive: each optional field belongs to
//! the version that introduced it, and a header must carry at least the
//! highest such version among the fields it populates.

use std::fmt;

use crate::ffi::{
    MqLong, MQCNO_VERSION_2, MQCNO_VERSION_4, MQCNO_VERSION_5, MQCNO_VERSION_6,
    MQCNO_VERSION_7, MQCNO_VERSION_8,
};

/// Optional part of the connection options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    ClientConn,
    SslConfig,
    SecurityParms,
    CcdtUrl,
    ApplName,
    BalanceParms,
}

impl Feature {
    /// Every feature, in encoding order
    pub const ALL: [Feature; 6] = [
        Feature::ClientConn,
        Feature::SslConfig,
        Feature::SecurityParms,
        Feature::CcdtUrl,
        Feature::ApplName,
        Feature::BalanceParms,
    ];

    /// First `MQCNO` version that carries this feature
    pub const fn min_version(self) -> MqLong {
        match self {
            Feature::ClientConn => MQCNO_VERSION_2,
            Feature::SslConfig => MQCNO_VERSION_4,
            Feature::SecurityParms => MQCNO_VERSION_5,
            Feature::CcdtUrl => MQCNO_VERSION_6,
            Feature::ApplName => MQCNO_VERSION_7,
            Feature::BalanceParms => MQCNO_VERSION_8,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::ClientConn => "ClientConn",
            Feature::SslConfig => "SSLConfig",
            Feature::SecurityParms => "SecurityParms",
            Feature::CcdtUrl => "CCDTUrl",
            Feature::ApplName => "ApplName",
            Feature::BalanceParms => "BalanceParms",
        };
        f.write_str(name)
    }
}

/// Minimum header version for `features`, never below `requested`
pub fn required_version<I>(requested: MqLong, features: I) -> MqLong
where
    I: IntoIterator<Item = Feature>,
{
    features
        .into_iter()
        .map(Feature::min_version)
        .fold(requested, MqLong::max)
}

/// Raise `version` to at least `tier`
pub(crate) fn raise_version(version: &mut MqLong, tier: MqLong) {
    if *version < tier {
        *version = tier;
    }
}
