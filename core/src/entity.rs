// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction entities
//!
//! Each entity knows its canonical encoding via [Serialize], [TxEntity]
//! provides a closed set over these for callers encoding single entities.

use serde::{
    ser::{SerializeMap, SerializeTuple},
    Serialize, Serializer,
};

use crate::{
    address,
    cbor::{self, Bytes},
    certificate::Certificate,
    path::DerivationPath,
    Error,
};

/// Public key length for witnesses
pub const PUBLIC_KEY_LEN: usize = 32;

/// Signature length for witnesses
pub const SIGNATURE_LEN: usize = 64;

/// Transaction input, a reference to a previous transaction output
#[derive(Clone, PartialEq, Debug)]
pub struct TxInput {
    tx_id: [u8; 32],
    output_index: u32,
    amount: u64,
    path: DerivationPath,
}

impl TxInput {
    /// Build an input from a hex-encoded previous transaction id
    pub fn new(
        tx_id_hex: &str,
        output_index: u32,
        amount: u64,
        path: DerivationPath,
    ) -> Result<Self, Error> {
        let raw = hex::decode(tx_id_hex)?;
        if raw.len() != 32 {
            return Err(Error::InvalidLength(raw.len(), 32));
        }

        let mut tx_id = [0u8; 32];
        tx_id.copy_from_slice(&raw);

        Ok(Self {
            tx_id,
            output_index,
            amount,
            path,
        })
    }

    pub fn tx_id(&self) -> &[u8; 32] {
        &self.tx_id
    }

    pub fn output_index(&self) -> u32 {
        self.output_index
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Path of the key owning this input
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }
}

/// Encoded as `[tx_id, output_index]`
impl Serialize for TxInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&Bytes(&self.tx_id))?;
        t.serialize_element(&self.output_index)?;
        t.end()
    }
}

/// Transaction output.
///
/// Outputs carrying a spending path are change outputs returning funds to
/// the wallet, the paths drive device preparation only and are not part
/// of the canonical encoding.
#[derive(Clone, PartialEq, Debug)]
pub struct TxOutput {
    address: String,
    address_bytes: Vec<u8>,
    amount: u64,
    spending_path: Option<DerivationPath>,
    staking_path: Option<DerivationPath>,
}

impl TxOutput {
    /// Build an output to a foreign address
    pub fn foreign(address: &str, amount: u64) -> Result<Self, Error> {
        Ok(Self {
            address: address.to_string(),
            address_bytes: address::decode(address)?,
            amount,
            spending_path: None,
            staking_path: None,
        })
    }

    /// Build a change output owned by the wallet.
    ///
    /// Where no staking path is provided this is resolved from the
    /// account of the spending path.
    pub fn change(
        address: &str,
        amount: u64,
        spending_path: DerivationPath,
        staking_path: Option<DerivationPath>,
    ) -> Result<Self, Error> {
        let staking_path = match staking_path {
            Some(p) => p,
            None => spending_path.staking_path()?,
        };

        Ok(Self {
            address: address.to_string(),
            address_bytes: address::decode(address)?,
            amount,
            spending_path: Some(spending_path),
            staking_path: Some(staking_path),
        })
    }

    /// Build an output, a change output iff a derivation path is provided
    pub fn new(
        address: &str,
        amount: u64,
        derivation_path: Option<DerivationPath>,
        staking_path: Option<DerivationPath>,
    ) -> Result<Self, Error> {
        match derivation_path {
            Some(p) => Self::change(address, amount, p, staking_path),
            None => Self::foreign(address, amount),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw (decoded) address bytes
    pub fn address_bytes(&self) -> &[u8] {
        &self.address_bytes
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn is_change(&self) -> bool {
        self.spending_path.is_some()
    }

    pub fn spending_path(&self) -> Option<&DerivationPath> {
        self.spending_path.as_ref()
    }

    pub fn staking_path(&self) -> Option<&DerivationPath> {
        self.staking_path.as_ref()
    }
}

/// Encoded as `[address_bytes, amount]`
impl Serialize for TxOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&Bytes(&self.address_bytes))?;
        t.serialize_element(&self.amount)?;
        t.end()
    }
}

/// Transaction fee
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(transparent)]
pub struct Fee(pub u64);

/// Absolute validity bound (slot)
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(transparent)]
pub struct Ttl(pub u64);

/// Reward withdrawal, encoded as an entry of the withdrawal map
#[derive(Clone, PartialEq, Debug)]
pub struct Withdrawal {
    reward_address: String,
    address_bytes: Vec<u8>,
    amount: u64,
}

impl Withdrawal {
    pub fn new(reward_address: &str, amount: u64) -> Result<Self, Error> {
        Ok(Self {
            reward_address: reward_address.to_string(),
            address_bytes: address::decode(reward_address)?,
            amount,
        })
    }

    pub fn reward_address(&self) -> &str {
        &self.reward_address
    }

    pub fn address_bytes(&self) -> &[u8] {
        &self.address_bytes
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Encoded standalone as a single entry map, `{ reward_address_bytes => amount }`
impl Serialize for Withdrawal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(1))?;
        m.serialize_entry(&Bytes(&self.address_bytes), &self.amount)?;
        m.end()
    }
}

/// Verification key witness
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Witness {
    pub public_key: [u8; PUBLIC_KEY_LEN],
    pub signature: [u8; SIGNATURE_LEN],
}

impl Witness {
    pub fn new(public_key: [u8; PUBLIC_KEY_LEN], signature: [u8; SIGNATURE_LEN]) -> Self {
        Self {
            public_key,
            signature,
        }
    }
}

/// Encoded as `[public_key, signature]`
impl Serialize for Witness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&Bytes(&self.public_key))?;
        t.serialize_element(&Bytes(&self.signature))?;
        t.end()
    }
}

/// Closed set of encodable transaction entities
#[derive(Clone, PartialEq, Debug)]
pub enum TxEntity {
    Input(TxInput),
    Output(TxOutput),
    Fee(Fee),
    Ttl(Ttl),
    Certificate(Certificate),
    Withdrawal(Withdrawal),
    Witness(Witness),
}

impl Serialize for TxEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TxEntity::Input(v) => v.serialize(serializer),
            TxEntity::Output(v) => v.serialize(serializer),
            TxEntity::Fee(v) => v.serialize(serializer),
            TxEntity::Ttl(v) => v.serialize(serializer),
            TxEntity::Certificate(v) => v.serialize(serializer),
            TxEntity::Withdrawal(v) => v.serialize(serializer),
            TxEntity::Witness(v) => v.serialize(serializer),
        }
    }
}

/// Encode a single transaction entity to canonical CBOR
pub fn encode(entity: &TxEntity) -> Result<Vec<u8>, Error> {
    cbor::to_vec(entity)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::harden;

    fn enterprise_address(fill: u8) -> String {
        let mut raw = vec![0x61];
        raw.extend_from_slice(&[fill; 28]);
        address::encode("addr", &raw).unwrap()
    }

    #[test]
    fn input_encoding() {
        let i = TxInput::new(&"aa".repeat(32), 1, 1_000_000, DerivationPath::master()).unwrap();

        let mut expected = vec![0x82, 0x58, 0x20];
        expected.extend_from_slice(&[0xaa; 32]);
        expected.push(0x01);

        assert_eq!(encode(&TxEntity::Input(i)).unwrap(), expected);
    }

    #[test]
    fn input_rejects_bad_tx_id() {
        assert!(matches!(
            TxInput::new("aabb", 0, 1, DerivationPath::master()),
            Err(Error::InvalidLength(2, 32))
        ));
        assert!(matches!(
            TxInput::new("xyz", 0, 1, DerivationPath::master()),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn output_change_flag_and_encoding() {
        let a = enterprise_address(0x01);
        let path = DerivationPath::from([harden(1852), harden(1815), harden(4), 1, 3]);

        let foreign = TxOutput::new(&a, 290_000, None, None).unwrap();
        assert!(!foreign.is_change());
        assert_eq!(foreign.staking_path(), None);

        let change = TxOutput::new(&a, 290_000, Some(path.clone()), None).unwrap();
        assert!(change.is_change());
        assert_eq!(change.spending_path(), Some(&path));
        assert_eq!(
            change.staking_path().unwrap().to_string(),
            "m/1852'/1815'/4'/2/0"
        );

        // Paths do not participate in the canonical encoding
        let e = encode(&TxEntity::Output(foreign)).unwrap();
        assert_eq!(e, encode(&TxEntity::Output(change)).unwrap());

        let mut expected = vec![0x82, 0x58, 0x1d, 0x61];
        expected.extend_from_slice(&[0x01; 28]);
        expected.extend_from_slice(&[0x1a, 0x00, 0x04, 0x6c, 0xd0]);
        assert_eq!(e, expected);
    }

    #[test]
    fn withdrawal_encoding() {
        let mut raw = vec![0xe1];
        raw.extend_from_slice(&[0x33; 28]);
        let a = address::encode("stake", &raw).unwrap();

        let w = Withdrawal::new(&a, 42).unwrap();
        assert_eq!(w.address_bytes(), &raw[..]);

        let mut expected = vec![0xa1, 0x58, 0x1d];
        expected.extend_from_slice(&raw);
        expected.push(0x18);
        expected.push(0x2a);
        assert_eq!(encode(&TxEntity::Withdrawal(w)).unwrap(), expected);
    }

    #[test]
    fn scalar_and_witness_encoding() {
        assert_eq!(encode(&TxEntity::Fee(Fee(10_000))).unwrap(), vec![0x19, 0x27, 0x10]);
        assert_eq!(
            encode(&TxEntity::Ttl(Ttl(500_000))).unwrap(),
            vec![0x1a, 0x00, 0x07, 0xa1, 0x20]
        );

        let w = Witness::new([0x01; 32], [0x02; 64]);
        let e = encode(&TxEntity::Witness(w)).unwrap();
        assert_eq!(&e[..3], &[0x82, 0x58, 0x20]);
        assert_eq!(&e[35..37], &[0x58, 0x40]);
        assert_eq!(e.len(), 3 + 32 + 2 + 64);
    }
}
