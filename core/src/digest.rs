// Copyright (c) 2022-2023 The MobileCoin Foundation

use blake2::{digest::consts::U32, Blake2b, Digest};

use crate::Error;

type Blake2b256 = Blake2b<U32>;

/// Compute a blake2b-256 digest over the provided bytes
pub fn blake2b_256(b: &[u8]) -> [u8; 32] {
    let mut d = [0u8; 32];
    d.copy_from_slice(&Blake2b256::digest(b));
    d
}

/// Transaction identifier, the blake2b-256 digest of the canonical
/// encoding of an unsigned transaction body
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct TxId([u8; 32]);

impl TxId {
    /// Compute the identifier for an encoded transaction body
    pub fn compute(encoded_body: &[u8]) -> Self {
        Self(blake2b_256(encoded_body))
    }

    /// Parse an identifier from (lower or upper case) hex
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let mut b = [0u8; 32];
        hex::decode_to_slice(s, &mut b)?;
        Ok(Self(b))
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for TxId {
    fn from(b: [u8; 32]) -> Self {
        Self(b)
    }
}

impl AsRef<[u8]> for TxId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for TxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in &self.0[..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl core::fmt::Display for TxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in &self.0[..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
