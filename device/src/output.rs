// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::{Deserialize, Serialize};
use strum::Display;

use ledger_ada_core::TxOutput;

/// Address type, the high nibble of the address header byte.
///
/// Key hash credentials take the plain variant names, script hash
/// credentials the `Script` suffixed ones. Headers outside the Shelley
/// ranges are carried as [AddressType::Other].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum AddressType {
    Base,
    BaseScriptKey,
    BaseKeyScript,
    BaseScriptScript,
    Pointer,
    PointerScript,
    Enterprise,
    EnterpriseScript,
    Byron,
    Reward,
    RewardScript,
    Other(u8),
}

impl AddressType {
    /// Resolve the address type from raw address bytes
    pub fn from_address(raw: &[u8]) -> Option<Self> {
        raw.first().map(|h| Self::from(h >> 4))
    }
}

impl From<u8> for AddressType {
    fn from(v: u8) -> Self {
        match v {
            0x00 => Self::Base,
            0x01 => Self::BaseScriptKey,
            0x02 => Self::BaseKeyScript,
            0x03 => Self::BaseScriptScript,
            0x04 => Self::Pointer,
            0x05 => Self::PointerScript,
            0x06 => Self::Enterprise,
            0x07 => Self::EnterpriseScript,
            0x08 => Self::Byron,
            0x0e => Self::Reward,
            0x0f => Self::RewardScript,
            _ => Self::Other(v),
        }
    }
}

impl From<AddressType> for u8 {
    fn from(t: AddressType) -> Self {
        match t {
            AddressType::Base => 0x00,
            AddressType::BaseScriptKey => 0x01,
            AddressType::BaseKeyScript => 0x02,
            AddressType::BaseScriptScript => 0x03,
            AddressType::Pointer => 0x04,
            AddressType::PointerScript => 0x05,
            AddressType::Enterprise => 0x06,
            AddressType::EnterpriseScript => 0x07,
            AddressType::Byron => 0x08,
            AddressType::Reward => 0x0e,
            AddressType::RewardScript => 0x0f,
            AddressType::Other(v) => v,
        }
    }
}

/// Output as presented to the signing device.
///
/// Change outputs are described by their derivation paths so the device
/// may verify ownership, foreign outputs by raw address only.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceOutput {
    #[serde(rename_all = "camelCase")]
    Change {
        address_type: AddressType,
        spending_path: Vec<u32>,
        amount: u64,
        staking_path: Vec<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Foreign { amount: u64, address_hex: String },
}

impl From<&TxOutput> for DeviceOutput {
    fn from(o: &TxOutput) -> Self {
        // Change outputs always carry both paths, empty addresses are
        // rejected on decode
        match (o.spending_path(), o.staking_path()) {
            (Some(spending), Some(staking)) => DeviceOutput::Change {
                address_type: AddressType::from_address(o.address_bytes())
                    .unwrap_or(AddressType::Base),
                spending_path: spending.to_device_path(),
                amount: o.amount(),
                staking_path: staking.to_device_path(),
            },
            _ => DeviceOutput::Foreign {
                amount: o.amount(),
                address_hex: hex::encode(o.address_bytes()),
            },
        }
    }
}

impl DeviceOutput {
    pub fn is_change(&self) -> bool {
        matches!(self, DeviceOutput::Change { .. })
    }
}
