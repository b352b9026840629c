// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::{Deserialize, Serialize};

use ledger_ada_core::TxInput;

/// Input as presented to the signing device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInput {
    pub tx_hash_hex: String,
    pub output_index: u32,
    pub signing_path: Vec<u32>,
}

impl From<&TxInput> for DeviceInput {
    fn from(i: &TxInput) -> Self {
        Self {
            tx_hash_hex: hex::encode(i.tx_id()),
            output_index: i.output_index(),
            signing_path: i.path().to_device_path(),
        }
    }
}
