// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::{Deserialize, Serialize};

use ledger_ada_core::{UnsignedTransactionBody, Withdrawal};

use crate::{DeviceCertificate, DeviceInput, DeviceOutput, Network};

/// Withdrawal as presented to the signing device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceWithdrawal {
    pub reward_address_hex: String,
    pub amount: u64,
}

impl From<&Withdrawal> for DeviceWithdrawal {
    fn from(w: &Withdrawal) -> Self {
        Self {
            reward_address_hex: hex::encode(w.address_bytes()),
            amount: w.amount(),
        }
    }
}

/// Complete signing request for a transaction body, carrying the same
/// logical content the body id is computed over
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub network_id: u8,
    pub protocol_magic: u32,
    pub inputs: Vec<DeviceInput>,
    pub outputs: Vec<DeviceOutput>,
    pub fee: u64,
    pub ttl: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<DeviceCertificate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withdrawals: Vec<DeviceWithdrawal>,
}

impl SigningRequest {
    /// Prepare a signing request for the provided body
    pub fn new(network: Network, body: &UnsignedTransactionBody) -> Self {
        Self {
            network_id: network.network_id,
            protocol_magic: network.protocol_magic,
            inputs: body.inputs().iter().map(DeviceInput::from).collect(),
            outputs: body.outputs().iter().map(DeviceOutput::from).collect(),
            fee: body.fee().0,
            ttl: body.ttl().0,
            certificates: body
                .certificates()
                .iter()
                .map(DeviceCertificate::from)
                .collect(),
            withdrawals: body
                .withdrawals()
                .iter()
                .map(DeviceWithdrawal::from)
                .collect(),
        }
    }
}
