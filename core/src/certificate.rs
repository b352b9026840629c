// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Staking certificates and their canonical encoding

use serde::{ser::SerializeTuple, Deserialize, Serialize, Serializer};
use strum::{Display, EnumIter};

use crate::{
    address::{self, CREDENTIAL_LEN},
    cbor::Bytes,
    path::DerivationPath,
    Error,
};

/// Length of a stake pool identifier hash
pub const POOL_HASH_LEN: usize = 28;

/// Certificate type, values are the on-chain certificate tags
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CertificateType {
    StakeKeyRegistration = 0,
    StakeKeyDeregistration = 1,
    StakeDelegation = 2,
    PoolRetirement = 4,
}

impl CertificateType {
    /// Whether certificates of this type reference a stake pool
    pub const fn has_pool(&self) -> bool {
        matches!(
            self,
            CertificateType::StakeDelegation | CertificateType::PoolRetirement
        )
    }
}

impl TryFrom<u8> for CertificateType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::StakeKeyRegistration),
            1 => Ok(Self::StakeKeyDeregistration),
            2 => Ok(Self::StakeDelegation),
            4 => Ok(Self::PoolRetirement),
            _ => Err(Error::InvalidCertificate(format!("unknown certificate type {v}"))),
        }
    }
}

impl From<CertificateType> for u8 {
    fn from(t: CertificateType) -> Self {
        t as u8
    }
}

impl std::str::FromStr for CertificateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "StakeKeyRegistration" | "registration" => Ok(Self::StakeKeyRegistration),
            "StakeKeyDeregistration" | "deregistration" => Ok(Self::StakeKeyDeregistration),
            "StakeDelegation" | "delegation" => Ok(Self::StakeDelegation),
            "PoolRetirement" | "retirement" => Ok(Self::PoolRetirement),
            _ => match s.parse::<u8>() {
                Ok(v) => Self::try_from(v),
                Err(_) => Err(Error::InvalidCertificate(format!("unknown certificate type '{s}'"))),
            },
        }
    }
}

/// Stake credential (key hash) derived from a reward account address
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StakeCredential(pub [u8; CREDENTIAL_LEN]);

impl StakeCredential {
    /// Resolve the credential for a bech32 reward address
    pub fn from_reward_address(reward_address: &str) -> Result<Self, Error> {
        address::stake_credential(reward_address).map(Self)
    }
}

/// Encoded as `[0, keyhash]`
impl Serialize for StakeCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&0u8)?;
        t.serialize_element(&Bytes(&self.0))?;
        t.end()
    }
}

/// Staking certificate
#[derive(Clone, PartialEq, Debug)]
pub struct Certificate {
    kind: CertificateType,
    credential: StakeCredential,
    pool_hash: Option<[u8; POOL_HASH_LEN]>,
    signing_path: DerivationPath,
}

impl Certificate {
    /// Build a certificate for the provided reward account.
    ///
    /// Delegation and retirement certificates require a (hex) pool id,
    /// registration and deregistration certificates ignore it.
    pub fn new(
        kind: CertificateType,
        reward_address: &str,
        pool_id: Option<&str>,
        signing_path: DerivationPath,
    ) -> Result<Self, Error> {
        let credential = StakeCredential::from_reward_address(reward_address)?;

        let pool_hash = match (kind.has_pool(), pool_id) {
            (true, Some(p)) => {
                let mut b = [0u8; POOL_HASH_LEN];
                hex::decode_to_slice(p, &mut b).map_err(|e| {
                    Error::InvalidCertificate(format!("invalid pool id '{p}': {e}"))
                })?;
                Some(b)
            }
            (true, None) => {
                return Err(Error::InvalidCertificate(format!(
                    "{kind} certificate requires a pool id"
                )))
            }
            (false, _) => None,
        };

        Ok(Self {
            kind,
            credential,
            pool_hash,
            signing_path,
        })
    }

    pub fn kind(&self) -> CertificateType {
        self.kind
    }

    pub fn credential(&self) -> &StakeCredential {
        &self.credential
    }

    pub fn pool_hash(&self) -> Option<&[u8; POOL_HASH_LEN]> {
        self.pool_hash.as_ref()
    }

    /// Signing path of the reward account key
    pub fn signing_path(&self) -> &DerivationPath {
        &self.signing_path
    }
}

/// Encoded as `[type, credential]` or `[type, credential, pool_hash]`
impl Serialize for Certificate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.pool_hash {
            None => {
                let mut t = serializer.serialize_tuple(2)?;
                t.serialize_element(&(self.kind as u8))?;
                t.serialize_element(&self.credential)?;
                t.end()
            }
            Some(p) => {
                let mut t = serializer.serialize_tuple(3)?;
                t.serialize_element(&(self.kind as u8))?;
                t.serialize_element(&self.credential)?;
                t.serialize_element(&Bytes(p))?;
                t.end()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{cbor, path::harden};

    fn reward_address() -> String {
        let mut raw = vec![0xe1];
        raw.extend_from_slice(&[0x11; CREDENTIAL_LEN]);
        address::encode("stake", &raw).unwrap()
    }

    fn stake_path() -> DerivationPath {
        DerivationPath::from([harden(1852), harden(1815), harden(0), 2, 0])
    }

    #[test]
    fn type_codes() {
        for t in CertificateType::iter() {
            assert_eq!(CertificateType::try_from(t as u8).unwrap(), t);
            assert_eq!(t.to_string().parse::<CertificateType>().unwrap(), t);
        }

        assert!(matches!(
            CertificateType::try_from(3u8),
            Err(Error::InvalidCertificate(_))
        ));
        assert!(matches!(
            "bogus".parse::<CertificateType>(),
            Err(Error::InvalidCertificate(_))
        ));
    }

    #[test]
    fn registration_encoding() {
        let c = Certificate::new(
            CertificateType::StakeKeyRegistration,
            &reward_address(),
            None,
            stake_path(),
        )
        .unwrap();

        let mut expected = vec![0x82, 0x00, 0x82, 0x00, 0x58, 0x1c];
        expected.extend_from_slice(&[0x11; CREDENTIAL_LEN]);

        assert_eq!(cbor::to_vec(&c).unwrap(), expected);
    }

    #[test]
    fn delegation_encoding() {
        let pool = "22".repeat(POOL_HASH_LEN);
        let c = Certificate::new(
            CertificateType::StakeDelegation,
            &reward_address(),
            Some(&pool),
            stake_path(),
        )
        .unwrap();

        let mut expected = vec![0x83, 0x02, 0x82, 0x00, 0x58, 0x1c];
        expected.extend_from_slice(&[0x11; CREDENTIAL_LEN]);
        expected.extend_from_slice(&[0x58, 0x1c]);
        expected.extend_from_slice(&[0x22; POOL_HASH_LEN]);

        assert_eq!(cbor::to_vec(&c).unwrap(), expected);
    }

    #[test]
    fn delegation_requires_pool() {
        let r = Certificate::new(
            CertificateType::StakeDelegation,
            &reward_address(),
            None,
            stake_path(),
        );
        assert!(matches!(r, Err(Error::InvalidCertificate(_))));

        let r = Certificate::new(
            CertificateType::PoolRetirement,
            &reward_address(),
            Some("zz"),
            stake_path(),
        );
        assert!(matches!(r, Err(Error::InvalidCertificate(_))));
    }

    #[test]
    fn malformed_reward_address() {
        let r = Certificate::new(
            CertificateType::StakeKeyRegistration,
            "stake1invalid",
            None,
            stake_path(),
        );
        assert!(matches!(r, Err(Error::AddressDecode(_))));
    }
}
