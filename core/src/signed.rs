// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signed transaction assembly

use serde::{
    ser::{SerializeMap, SerializeTuple},
    Serialize, Serializer,
};
use serde_cbor::Value;

use crate::{
    body::UnsignedTransactionBody,
    cbor::{self, Seq},
    digest::TxId,
    entity::Witness,
    Error,
};

/// Witness set map key for verification key witnesses
pub const VKEY_WITNESSES: u64 = 0;

/// Witnesses collected for a transaction, keyed by witness type
#[derive(Clone, PartialEq, Debug, Default)]
pub struct WitnessSet {
    vkey: Vec<Witness>,
}

impl WitnessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a verification key witness, duplicates (by public key) are ignored
    pub fn add(&mut self, w: Witness) {
        if !self.vkey.iter().any(|v| v.public_key == w.public_key) {
            self.vkey.push(w);
        }
    }

    pub fn vkey_witnesses(&self) -> &[Witness] {
        &self.vkey
    }

    pub fn len(&self) -> usize {
        self.vkey.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vkey.is_empty()
    }
}

impl FromIterator<Witness> for WitnessSet {
    fn from_iter<I: IntoIterator<Item = Witness>>(iter: I) -> Self {
        let mut s = Self::new();
        for w in iter {
            s.add(w);
        }
        s
    }
}

/// Encoded as `{ 0 => [witness, ...] }`, empty witness types omitted
impl Serialize for WitnessSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = usize::from(!self.vkey.is_empty());
        let mut m = serializer.serialize_map(Some(n))?;
        if !self.vkey.is_empty() {
            m.serialize_entry(&VKEY_WITNESSES, &Seq(&self.vkey))?;
        }
        m.end()
    }
}

/// Signed transaction, immutable once assembled
#[derive(Clone, PartialEq, Debug)]
pub struct SignedTransaction {
    body: UnsignedTransactionBody,
    witnesses: WitnessSet,
    metadata: Option<Value>,
}

impl SignedTransaction {
    /// Assemble a signed transaction from a body and collected witnesses
    pub fn new(body: UnsignedTransactionBody, witnesses: WitnessSet) -> Self {
        Self {
            body,
            witnesses,
            metadata: None,
        }
    }

    /// Assemble a signed transaction with (reserved) metadata
    pub fn with_metadata(
        body: UnsignedTransactionBody,
        witnesses: WitnessSet,
        metadata: Value,
    ) -> Self {
        Self {
            body,
            witnesses,
            metadata: Some(metadata),
        }
    }

    /// Identifier of the underlying body, witnesses never alter this
    pub fn id(&self) -> TxId {
        self.body.id()
    }

    pub fn body(&self) -> &UnsignedTransactionBody {
        &self.body
    }

    pub fn witnesses(&self) -> &WitnessSet {
        &self.witnesses
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Canonical wire encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        cbor::to_vec(self)
    }

    /// Hex wire encoding, as expected by submission services
    pub fn to_hex(&self) -> Result<String, Error> {
        self.to_bytes().map(hex::encode)
    }
}

/// Encoded as `[body, witnesses, metadata / null]`
impl Serialize for SignedTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(3)?;
        t.serialize_element(&self.body)?;
        t.serialize_element(&self.witnesses)?;
        t.serialize_element(&self.metadata)?;
        t.end()
    }
}
