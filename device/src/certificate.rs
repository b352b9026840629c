// Copyright (c) 2022-2023 The MobileCoin Foundation

use serde::{Deserialize, Serialize};
use strum::Display;

use ledger_ada_core::{Certificate, CertificateType};

/// Certificate type codes as enumerated by the signing device
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DeviceCertificateType {
    StakeRegistration = 0,
    StakeDeregistration = 1,
    StakeDelegation = 2,
    StakePoolRetirement = 4,
}

impl From<CertificateType> for DeviceCertificateType {
    fn from(t: CertificateType) -> Self {
        match t {
            CertificateType::StakeKeyRegistration => Self::StakeRegistration,
            CertificateType::StakeKeyDeregistration => Self::StakeDeregistration,
            CertificateType::StakeDelegation => Self::StakeDelegation,
            CertificateType::PoolRetirement => Self::StakePoolRetirement,
        }
    }
}

impl TryFrom<u8> for DeviceCertificateType {
    type Error = ledger_ada_core::Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        CertificateType::try_from(v).map(Self::from)
    }
}

impl From<DeviceCertificateType> for u8 {
    fn from(t: DeviceCertificateType) -> Self {
        t as u8
    }
}

/// Certificate as presented to the signing device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCertificate {
    #[serde(rename = "type")]
    pub certificate_type: DeviceCertificateType,
    /// Reward account signing path (`1852'/1815'/0'/2/0`)
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_key_hash_hex: Option<String>,
}

impl From<&Certificate> for DeviceCertificate {
    fn from(c: &Certificate) -> Self {
        Self {
            certificate_type: c.kind().into(),
            path: c.signing_path().to_device_string(),
            pool_key_hash_hex: c.pool_hash().map(hex::encode),
        }
    }
}
