//! Host-side connection option types
//!
//! These are the caller-owned values the encoder reads. They mirror the
//! subset of `MQCNO`, `MQCSP` and `MQBNO` that applications set, with
//! defaults matching the MQI's own initial values.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::cno::{Feature, SubBlockCodec};
use crate::ffi::{MqLong, MQCNO_VERSION_1, MQ_CONNECTION_ID_LENGTH, MQ_CONN_TAG_LENGTH};

/// `MQCNO.Options` flags
pub mod cno_options {
    use crate::ffi::MqLong;

    pub const MQCNO_NONE: MqLong = 0x0000_0000;
    pub const MQCNO_STANDARD_BINDING: MqLong = 0x0000_0000;
    pub const MQCNO_FASTPATH_BINDING: MqLong = 0x0000_0001;
    pub const MQCNO_SERIALIZE_CONN_TAG_Q_MGR: MqLong = 0x0000_0002;
    pub const MQCNO_SERIALIZE_CONN_TAG_QSG: MqLong = 0x0000_0004;
    pub const MQCNO_RESTRICT_CONN_TAG_Q_MGR: MqLong = 0x0000_0008;
    pub const MQCNO_RESTRICT_CONN_TAG_QSG: MqLong = 0x0000_0010;
    pub const MQCNO_HANDLE_SHARE_NONE: MqLong = 0x0000_0020;
    pub const MQCNO_HANDLE_SHARE_BLOCK: MqLong = 0x0000_0040;
    pub const MQCNO_HANDLE_SHARE_NO_BLOCK: MqLong = 0x0000_0080;
    pub const MQCNO_SHARED_BINDING: MqLong = 0x0000_0100;
    pub const MQCNO_ISOLATED_BINDING: MqLong = 0x0000_0200;
    pub const MQCNO_LOCAL_BINDING: MqLong = 0x0000_0400;
    pub const MQCNO_CLIENT_BINDING: MqLong = 0x0000_0800;
    pub const MQCNO_RECONNECT_AS_DEF: MqLong = 0x0000_0000;
    pub const MQCNO_RECONNECT: MqLong = 0x0100_0000;
    pub const MQCNO_RECONNECT_DISABLED: MqLong = 0x0200_0000;
    pub const MQCNO_RECONNECT_Q_MGR: MqLong = 0x0400_0000;
}

/// `MQCSP.AuthenticationType`
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthenticationType {
    #[default]
    None = 0,
    UserIdAndPassword = 1,
    IdToken = 2,
}

impl AuthenticationType {
    pub fn as_mqlong(self) -> MqLong {
        self as MqLong
    }
}

/// Security parameters (user id and password)
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecurityParms {
    pub authentication_type: AuthenticationType,
    pub user_id: String,
    pub password: String,
}

impl SecurityParms {
    pub fn new() -> Self {
        Self::default()
    }

    /// User id and password authentication
    pub fn user_password(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            authentication_type: AuthenticationType::UserIdAndPassword,
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Authentication type sent to the library. A user id always means
    /// user id and password, whatever the caller asked for.
    pub fn effective_authentication_type(&self) -> AuthenticationType {
        if self.user_id.is_empty() {
            self.authentication_type
        } else {
            AuthenticationType::UserIdAndPassword
        }
    }
}

impl fmt::Debug for SecurityParms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityParms")
            .field("authentication_type", &self.authentication_type)
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Drop for SecurityParms {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Balancing options for uniform clusters (`MQBNO`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancingParms {
    pub appl_type: MqLong,
    /// Seconds; `MQBNO_TIMEOUT_AS_DEFAULT` lets the library decide
    pub timeout: MqLong,
    pub options: MqLong,
}

impl BalancingParms {
    pub const MQBNO_BALTYPE_SIMPLE: MqLong = 0x0000_0000;
    pub const MQBNO_BALTYPE_REQREP: MqLong = 0x0000_0001;
    pub const MQBNO_BALTYPE_RA_MANAGED: MqLong = 0x0001_0000;

    pub const MQBNO_TIMEOUT_AS_DEFAULT: MqLong = -1;
    pub const MQBNO_TIMEOUT_IMMEDIATE: MqLong = 0;
    pub const MQBNO_TIMEOUT_NEVER: MqLong = -2;

    pub const MQBNO_OPTIONS_NONE: MqLong = 0x0000_0000;
    pub const MQBNO_OPTIONS_IGNORE_TRANS: MqLong = 0x0000_0001;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for BalancingParms {
    fn default() -> Self {
        Self {
            appl_type: Self::MQBNO_BALTYPE_SIMPLE,
            timeout: Self::MQBNO_TIMEOUT_AS_DEFAULT,
            options: Self::MQBNO_OPTIONS_NONE,
        }
    }
}

/// Connection options for one connect attempt
pub struct ConnectionOptions {
    /// Requested structure version; the encoder may raise it
    pub version: MqLong,
    pub options: MqLong,
    pub security_parms: Option<SecurityParms>,
    /// Client channel definition, formatted by its own codec
    pub client_conn: Option<Box<dyn SubBlockCodec>>,
    /// TLS configuration, formatted by its own codec
    pub ssl_config: Option<Box<dyn SubBlockCodec>>,
    /// An empty URL is treated as unset
    pub ccdt_url: Option<String>,
    /// An empty name is treated as unset
    pub appl_name: Option<String>,
    pub balance_parms: Option<BalancingParms>,
    /// Filled in after the connect call
    pub conn_tag: [u8; MQ_CONN_TAG_LENGTH],
    /// Filled in after the connect call
    pub connection_id: [u8; MQ_CONNECTION_ID_LENGTH],
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: MqLong) -> Self {
        self.options = options;
        self
    }

    pub fn with_security_parms(mut self, csp: SecurityParms) -> Self {
        self.security_parms = Some(csp);
        self
    }

    pub fn with_client_conn(mut self, cd: impl SubBlockCodec + 'static) -> Self {
        self.client_conn = Some(Box::new(cd));
        self
    }

    pub fn with_ssl_config(mut self, sco: impl SubBlockCodec + 'static) -> Self {
        self.ssl_config = Some(Box::new(sco));
        self
    }

    pub fn with_ccdt_url(mut self, url: impl Into<String>) -> Self {
        self.ccdt_url = Some(url.into());
        self
    }

    pub fn with_appl_name(mut self, name: impl Into<String>) -> Self {
        self.appl_name = Some(name.into());
        self
    }

    pub fn with_balance_parms(mut self, bno: BalancingParms) -> Self {
        self.balance_parms = Some(bno);
        self
    }

    /// CCDT URL, if set and non-empty
    pub fn ccdt_url(&self) -> Option<&str> {
        self.ccdt_url.as_deref().filter(|s| !s.is_empty())
    }

    /// Application name, if set and non-empty
    pub fn appl_name(&self) -> Option<&str> {
        self.appl_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Optional features populated on this value, in encoding order
    pub fn populated_features(&self) -> Vec<Feature> {
        let mut features = Vec::new();
        if self.client_conn.is_some() {
            features.push(Feature::ClientConn);
        }
        if self.ssl_config.is_some() {
            features.push(Feature::SslConfig);
        }
        if self.security_parms.is_some() {
            features.push(Feature::SecurityParms);
        }
        if self.ccdt_url().is_some() {
            features.push(Feature::CcdtUrl);
        }
        if self.appl_name().is_some() {
            features.push(Feature::ApplName);
        }
        if self.balance_parms.is_some() {
            features.push(Feature::BalanceParms);
        }
        features
    }

    /// Connection id returned by the queue manager, as hex
    pub fn connection_id_hex(&self) -> String {
        hex::encode(self.connection_id)
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            version: MQCNO_VERSION_1,
            options: cno_options::MQCNO_NONE,
            security_parms: None,
            client_conn: None,
            ssl_config: None,
            ccdt_url: None,
            appl_name: None,
            balance_parms: None,
            conn_tag: [0; MQ_CONN_TAG_LENGTH],
            connection_id: [0; MQ_CONNECTION_ID_LENGTH],
        }
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("version", &self.version)
            .field("options", &format_args!("{:#010x}", self.options))
            .field("security_parms", &self.security_parms)
            .field("client_conn", &self.client_conn)
            .field("ssl_config", &self.ssl_config)
            .field("ccdt_url", &self.ccdt_url)
            .field("appl_name", &self.appl_name)
            .field("balance_parms", &self.balance_parms)
            .field("connection_id", &self.connection_id_hex())
            .finish()
    }
}
