// Copyright (c) 2022-2023 The MobileCoin Foundation

//! External transaction signer (the hardware device)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ledger_ada_core::Witness;
use ledger_ada_device::SigningRequest;

use crate::Error;

/// Witness as returned by the signing device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceWitness {
    pub public_key_hex: String,
    pub signature_hex: String,
}

impl TryFrom<&DeviceWitness> for Witness {
    type Error = Error;

    fn try_from(w: &DeviceWitness) -> Result<Self, Self::Error> {
        let (mut public_key, mut signature) = ([0u8; 32], [0u8; 64]);

        hex::decode_to_slice(&w.public_key_hex, &mut public_key)
            .map_err(ledger_ada_core::Error::from)?;
        hex::decode_to_slice(&w.signature_hex, &mut signature)
            .map_err(ledger_ada_core::Error::from)?;

        Ok(Witness::new(public_key, signature))
    }
}

impl From<&Witness> for DeviceWitness {
    fn from(w: &Witness) -> Self {
        Self {
            public_key_hex: hex::encode(w.public_key),
            signature_hex: hex::encode(w.signature),
        }
    }
}

/// Signing device response, the transaction id displayed to (and
/// approved by) the user and one witness per signing key
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerResponse {
    pub tx_hash_hex: String,
    pub witnesses: Vec<DeviceWitness>,
}

/// Signing device capability
#[async_trait]
pub trait TransactionSigner: Send + 'static {
    /// Request witnesses for a prepared transaction, this blocks on
    /// user approval
    async fn sign(&mut self, req: &SigningRequest) -> Result<SignerResponse, Error>;
}
