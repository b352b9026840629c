// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Coin selection plan, the externally computed inputs / outputs / fee
//! for a transaction prior to building

use serde::{Deserialize, Serialize};

use crate::{certificate::CertificateType, path::DerivationPath};

/// Selected transaction plan
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPlan {
    pub inputs: Vec<PlanInput>,
    pub outputs: Vec<PlanOutput>,
    pub fee: u64,
    pub ttl: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<CertificateRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withdrawals: Vec<WithdrawalRequest>,
}

/// Selected input (unspent output)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Address holding the unspent output
    pub address: String,
    pub amount: u64,
    /// Hex encoded id of the transaction containing the output
    pub id: String,
    /// Output index within the transaction
    pub index: u32,
    /// Path of the key owning the address
    pub derivation_path: DerivationPath,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub address: String,
    pub amount: u64,
    /// Present for change outputs only
    #[serde(default)]
    pub derivation_path: Option<DerivationPath>,
}

/// Logical certificate request
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[serde(rename = "type")]
    pub certificate_type: CertificateType,
    /// Bech32 reward account address
    pub stake_address: String,
    /// Hex encoded pool id (delegation / retirement)
    #[serde(default)]
    pub pool_id: Option<String>,
    /// Path of the reward account key, resolved from the wallet account where omitted
    #[serde(default)]
    pub signing_path: Option<DerivationPath>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub stake_address: String,
    pub amount: u64,
}
