//! Foreign Function Interface layouts
//!
//! C-compatible definitions of the connection-options structures the MQ
//! client library reads on connect. Each struct carries every field up to
//! its current version; the library only looks at the fields covered by
//! the `version` the encoder writes.

mod types;

pub use types::*;

use std::ptr;

/// Connection options (MQCNO)
///
/// **Memory Layout (272 bytes on 64-bit)**:
/// - Offset 0: `struc_id`, 4: `version`, 8: `options` (v1)
/// - Offset 12: `client_conn_offset`, 16: `client_conn_ptr` (v2)
/// - Offset 24: `conn_tag` (v3)
/// - Offset 152: `ssl_config_ptr`, 160: `ssl_config_offset` (v4)
/// - Offset 164: `connection_id`, 188: `security_parms_offset`,
///   192: `security_parms_ptr` (v5)
/// - Offset 200: `ccdt_url_ptr`, 208: `ccdt_url_offset`, 212: `ccdt_url_length` (v6)
/// - Offset 224: `appl_name` (v7)
/// - Offset 256: `balance_parms_ptr`, 264: `balance_parms_offset` (v8)
#[repr(C)]
#[derive(Debug)]
pub struct Mqcno {
    pub struc_id: [u8; 4],
    pub version: MqLong,
    pub options: MqLong,
    pub client_conn_offset: MqLong,
    pub client_conn_ptr: MqPtr,
    pub conn_tag: [u8; MQ_CONN_TAG_LENGTH],
    pub ssl_config_ptr: MqPtr,
    pub ssl_config_offset: MqLong,
    pub connection_id: [u8; MQ_CONNECTION_ID_LENGTH],
    pub security_parms_offset: MqLong,
    pub security_parms_ptr: *mut Mqcsp,
    pub ccdt_url_ptr: *mut u8,
    pub ccdt_url_offset: MqLong,
    pub ccdt_url_length: MqLong,
    pub reserved: [u8; 8],
    pub appl_name: [u8; MQ_APPL_NAME_LENGTH],
    pub reserved2: [u8; 4],
    pub balance_parms_ptr: *mut Mqbno,
    pub balance_parms_offset: MqLong,
    pub reserved3: [u8; 4],
}

impl Mqcno {
    /// An all-zero header: no tag, version 0, every pointer null
    pub const fn zeroed() -> Self {
        Self {
            struc_id: [0; 4],
            version: 0,
            options: 0,
            client_conn_offset: 0,
            client_conn_ptr: ptr::null_mut(),
            conn_tag: [0; MQ_CONN_TAG_LENGTH],
            ssl_config_ptr: ptr::null_mut(),
            ssl_config_offset: 0,
            connection_id: [0; MQ_CONNECTION_ID_LENGTH],
            security_parms_offset: 0,
            security_parms_ptr: ptr::null_mut(),
            ccdt_url_ptr: ptr::null_mut(),
            ccdt_url_offset: 0,
            ccdt_url_length: 0,
            reserved: [0; 8],
            appl_name: [0; MQ_APPL_NAME_LENGTH],
            reserved2: [0; 4],
            balance_parms_ptr: ptr::null_mut(),
            balance_parms_offset: 0,
            reserved3: [0; 4],
        }
    }

    /// True when no sub-block pointer is set
    pub fn has_no_sub_blocks(&self) -> bool {
        self.client_conn_ptr.is_null()
            && self.ssl_config_ptr.is_null()
            && self.security_parms_ptr.is_null()
            && self.ccdt_url_ptr.is_null()
            && self.balance_parms_ptr.is_null()
    }
}

impl Default for Mqcno {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Security parameters (MQCSP), version 1
///
/// **Memory Layout (56 bytes on 64-bit)**:
/// - Offset 0: `struc_id`, 4: `version`, 8: `authentication_type`
/// - Offset 16: `user_id_ptr`, 24: `user_id_offset`, 28: `user_id_length`
/// - Offset 40: `password_ptr`, 48: `password_offset`, 52: `password_length`
#[repr(C)]
#[derive(Debug)]
pub struct Mqcsp {
    pub struc_id: [u8; 4],
    pub version: MqLong,
    pub authentication_type: MqLong,
    pub reserved1: [u8; 4],
    pub user_id_ptr: MqPtr,
    pub user_id_offset: MqLong,
    pub user_id_length: MqLong,
    pub reserved2: [u8; 8],
    pub password_ptr: MqPtr,
    pub password_offset: MqLong,
    pub password_length: MqLong,
}

impl Mqcsp {
    /// Tagged version-1 block with no credentials attached
    pub const fn new() -> Self {
        Self {
            struc_id: MQCSP_STRUC_ID,
            version: MQCSP_VERSION_1,
            authentication_type: 0,
            reserved1: [0; 4],
            user_id_ptr: ptr::null_mut(),
            user_id_offset: 0,
            user_id_length: 0,
            reserved2: [0; 8],
            password_ptr: ptr::null_mut(),
            password_offset: 0,
            password_length: 0,
        }
    }
}

impl Default for Mqcsp {
    fn default() -> Self {
        Self::new()
    }
}

/// Balancing options (MQBNO), version 1
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mqbno {
    pub struc_id: [u8; 4],
    pub version: MqLong,
    pub appl_type: MqLong,
    pub timeout: MqLong,
    pub options: MqLong,
}

impl Mqbno {
    pub const fn new(appl_type: MqLong, timeout: MqLong, options: MqLong) -> Self {
        Self {
            struc_id: MQBNO_STRUC_ID,
            version: MQBNO_VERSION_1,
            appl_type,
            timeout,
            options,
        }
    }
}
