// Copyright (c) 2022-2023 The MobileCoin Foundation

//! External key derivation primitives

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ledger_ada_core::DerivationPath;

use crate::Error;

/// Extended public key (public key and chain code)
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtendedPublicKey {
    pub public_key: [u8; 32],
    pub chain_code: [u8; 32],
}

impl ExtendedPublicKey {
    pub fn new(public_key: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self {
            public_key,
            chain_code,
        }
    }

    /// Decode from 64 bytes (`public_key || chain_code`)
    pub fn from_bytes(b: &[u8]) -> Result<Self, Error> {
        if b.len() != 64 {
            return Err(ledger_ada_core::Error::InvalidLength(b.len(), 64).into());
        }

        let (mut public_key, mut chain_code) = ([0u8; 32], [0u8; 32]);
        public_key.copy_from_slice(&b[..32]);
        chain_code.copy_from_slice(&b[32..]);

        Ok(Self::new(public_key, chain_code))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut b = [0u8; 64];
        b[..32].copy_from_slice(&self.public_key);
        b[32..].copy_from_slice(&self.chain_code);
        b
    }
}

impl Display for ExtendedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl std::fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExtendedPublicKey({})", hex::encode(self.public_key))
    }
}

/// Curve mode for non-hardened child derivation
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum DerivationScheme {
    /// Legacy scheme
    V1,
    /// Current scheme
    #[default]
    V2,
}

/// Key derivation capabilities, backed by the key custody device (hardened)
/// and an elliptic curve implementation (non-hardened)
#[async_trait]
pub trait KeyDeriver: Send + Sync + 'static {
    /// Derive the extended public key for an absolute path via the root
    /// key material (chaining is internal to the implementation)
    async fn derive_hardened(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error>;

    /// Derive a non-hardened child of the provided parent key
    async fn derive_child(
        &self,
        parent: &ExtendedPublicKey,
        index: u32,
        scheme: DerivationScheme,
    ) -> Result<ExtendedPublicKey, Error>;
}

#[async_trait]
impl<T: KeyDeriver> KeyDeriver for Arc<T> {
    async fn derive_hardened(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error> {
        self.as_ref().derive_hardened(path).await
    }

    async fn derive_child(
        &self,
        parent: &ExtendedPublicKey,
        index: u32,
        scheme: DerivationScheme,
    ) -> Result<ExtendedPublicKey, Error> {
        self.as_ref().derive_child(parent, index, scheme).await
    }
}
