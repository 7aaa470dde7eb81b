//! FFI type definitions
//!
//! C-compatible scalar types and constants shared by the MQI structures.

use std::ffi::c_void;

/// 32-bit signed integer used for every numeric MQI field
pub type MqLong = i32;

/// Untyped pointer field
pub type MqPtr = *mut c_void;

pub const MQCNO_STRUC_ID: [u8; 4] = *b"CNO ";
pub const MQCSP_STRUC_ID: [u8; 4] = *b"CSP ";
pub const MQBNO_STRUC_ID: [u8; 4] = *b"BNO ";

pub const MQCNO_VERSION_1: MqLong = 1;
pub const MQCNO_VERSION_2: MqLong = 2;
pub const MQCNO_VERSION_3: MqLong = 3;
pub const MQCNO_VERSION_4: MqLong = 4;
pub const MQCNO_VERSION_5: MqLong = 5;
pub const MQCNO_VERSION_6: MqLong = 6;
pub const MQCNO_VERSION_7: MqLong = 7;
pub const MQCNO_VERSION_8: MqLong = 8;
pub const MQCNO_CURRENT_VERSION: MqLong = MQCNO_VERSION_8;

pub const MQCSP_VERSION_1: MqLong = 1;
pub const MQBNO_VERSION_1: MqLong = 1;

pub const MQ_CONN_TAG_LENGTH: usize = 128;
pub const MQ_CONNECTION_ID_LENGTH: usize = 24;
pub const MQ_APPL_NAME_LENGTH: usize = 28;

/// Convert a buffer length to an MQLONG, saturating at `MqLong::MAX`
pub(crate) fn to_mqlong(len: usize) -> MqLong {
    MqLong::try_from(len).unwrap_or(MqLong::MAX)
}
