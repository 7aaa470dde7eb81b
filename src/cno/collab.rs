//! Collaborator sub-block codecs
//!
//! The client channel definition (`MQCD`) and TLS configuration (`MQSCO`)
//! have converters of their own. The marshaling core only sizes, allocates
//! and releases their foreign blocks; the codec does the field mapping.

use std::fmt;

/// Converter between a host value and its foreign structure
pub trait SubBlockCodec: fmt::Debug + Send {
    /// Size in bytes of the foreign structure
    fn foreign_len(&self) -> usize;

    /// Write the host value into `dst`. `dst` is `foreign_len()` bytes and
    /// zero-filled on entry.
    fn encode(&self, dst: &mut [u8]);

    /// Read whatever the connect call left in `src` back into the host value
    fn decode(&mut self, src: &[u8]);
}

/// Pre-formatted foreign structure carried as raw bytes
///
/// For callers that already hold an `MQCD` or `MQSCO` image. The image is
/// copied in before the call and refreshed from the foreign block after it.
#[derive(Clone, PartialEq, Eq)]
pub struct ForeignImage {
    bytes: Vec<u8>,
}

impl ForeignImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Zero-filled image of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self { bytes: vec![0; len] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for ForeignImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SubBlockCodec for ForeignImage {
    fn foreign_len(&self) -> usize {
        self.bytes.len()
    }

    fn encode(&self, dst: &mut [u8]) {
        let n = dst.len().min(self.bytes.len());
        dst[..n].copy_from_slice(&self.bytes[..n]);
    }

    fn decode(&mut self, src: &[u8]) {
        let n = src.len().min(self.bytes.len());
        self.bytes[..n].copy_from_slice(&src[..n]);
    }
}
