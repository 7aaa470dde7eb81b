//! Fields that only newer client libraries understand
//!
//! The CCDT URL (MQ 9.0), application name (9.1.2) and balancing parameters
//! (9.2.4) are accepted on every build. When the linked library cannot
//! express one, it is recorded as dropped and nothing is allocated for it.
//! The release side checks the same capability, so it is always safe to
//! call.

use std::ptr;

use super::version::raise_version;
use super::{ConnectionBlock, Feature};
use crate::config::DroppedFeaturePolicy;
use crate::ffi::{to_mqlong, Mqbno, MQCNO_VERSION_8};
use crate::memory::{AllocationKind, ForeignAllocator};
use crate::types::BalancingParms;

pub(super) fn set_ccdt_url<A: ForeignAllocator>(
    block: &mut ConnectionBlock<A>,
    url: &str,
    policy: DroppedFeaturePolicy,
) {
    if !block.capabilities.supports(Feature::CcdtUrl) {
        block.drop_feature(Feature::CcdtUrl, policy);
        return;
    }

    let (url_ptr, len) = block.arena.copy_str(AllocationKind::CcdtUrl, url);
    let cno = &mut *block.header;
    cno.ccdt_url_offset = 0;
    cno.ccdt_url_ptr = url_ptr.as_ptr();
    cno.ccdt_url_length = to_mqlong(len);
    raise_version(&mut cno.version, Feature::CcdtUrl.min_version());
}

pub(super) fn release_ccdt_url<A: ForeignAllocator>(block: &mut ConnectionBlock<A>) {
    if !block.capabilities.supports(Feature::CcdtUrl) {
        return;
    }

    let url_ptr = std::mem::replace(&mut block.header.ccdt_url_ptr, ptr::null_mut());
    block.header.ccdt_url_length = 0;
    if !url_ptr.is_null() {
        block.arena.release(url_ptr);
    }
}

/// Copied into the fixed-width field the way `strncpy` would: stops at the
/// first NUL, truncates to the field width and zero-pads the rest.
pub(super) fn set_appl_name<A: ForeignAllocator>(
    block: &mut ConnectionBlock<A>,
    name: &str,
    policy: DroppedFeaturePolicy,
) {
    if !block.capabilities.supports(Feature::ApplName) {
        block.drop_feature(Feature::ApplName, policy);
        return;
    }

    let cno = &mut *block.header;
    let bytes = name.as_bytes();
    let len = bytes
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(bytes.len())
        .min(cno.appl_name.len());
    if len < bytes.len() {
        tracing::debug!(name, width = cno.appl_name.len(), "truncating application name");
    }

    cno.appl_name.fill(0);
    cno.appl_name[..len].copy_from_slice(&bytes[..len]);
    raise_version(&mut cno.version, Feature::ApplName.min_version());
}

pub(super) fn set_balance_parms<A: ForeignAllocator>(
    block: &mut ConnectionBlock<A>,
    bno: &BalancingParms,
    policy: DroppedFeaturePolicy,
) {
    if !block.capabilities.supports(Feature::BalanceParms) {
        block.drop_feature(Feature::BalanceParms, policy);
        return;
    }

    let foreign = Mqbno::new(bno.appl_type, bno.timeout, bno.options);
    let bno_ptr = block.arena.alloc_struct(AllocationKind::BalanceParms, foreign);
    let cno = &mut *block.header;
    cno.balance_parms_offset = 0;
    cno.balance_parms_ptr = bno_ptr.as_ptr();
    raise_version(&mut cno.version, Feature::BalanceParms.min_version());
}

pub(super) fn release_balance_parms<A: ForeignAllocator>(block: &mut ConnectionBlock<A>) {
    if !block.capabilities.supports(Feature::BalanceParms)
        || block.header.version < MQCNO_VERSION_8
    {
        return;
    }

    let bno_ptr = std::mem::replace(&mut block.header.balance_parms_ptr, ptr::null_mut());
    if !bno_ptr.is_null() {
        block.arena.release(bno_ptr as *const u8);
    }
}
