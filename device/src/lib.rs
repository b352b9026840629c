// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device-facing request definitions for Cardano hardware wallets
//!
//! These are pure translations from [ledger_ada_core] entities to the
//! parameter shapes consumed by the signing device. No state is held and
//! no encoding is performed beyond the field mapping, serialisation is via
//! `serde` (camelCase field names) for transport by the caller.
//!
//! - [DeviceInput]: `{ txHashHex, outputIndex, signingPath }`
//! - [DeviceOutput]: change `{ addressType, spendingPath, amount, stakingPath }`
//!   or foreign `{ amount, addressHex }`
//! - [DeviceCertificate]: `{ type, path, poolKeyHashHex? }`
//! - [SigningRequest]: the complete request for a transaction body

use serde::{Deserialize, Serialize};

pub mod certificate;
pub use certificate::{DeviceCertificate, DeviceCertificateType};

pub mod input;
pub use input::DeviceInput;

pub mod output;
pub use output::{AddressType, DeviceOutput};

pub mod tx;
pub use tx::{DeviceWithdrawal, SigningRequest};

/// Network parameters supplied with each signing request
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub network_id: u8,
    pub protocol_magic: u32,
}

impl Network {
    pub const MAINNET: Network = Network {
        network_id: 1,
        protocol_magic: 764_824_073,
    };

    pub const TESTNET: Network = Network {
        network_id: 0,
        protocol_magic: 1_097_911_063,
    };
}

impl Default for Network {
    fn default() -> Self {
        Self::MAINNET
    }
}
