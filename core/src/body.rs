// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Unsigned transaction body aggregation
//!
//! The body is encoded as a definite-length map with integer keys in
//! ascending order:
//!
//! | key | field        | presence                  |
//! |-----|--------------|---------------------------|
//! | 0   | inputs       | required                  |
//! | 1   | outputs      | required                  |
//! | 2   | fee          | required                  |
//! | 3   | ttl          | required                  |
//! | 4   | certificates | omitted when empty        |
//! | 5   | withdrawals  | omitted when empty        |
//!
//! Empty optional collections are omitted rather than encoded empty, as
//! the signing device and consensus nodes recompute the same id.

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    cbor::{self, Bytes, Seq},
    certificate::Certificate,
    digest::TxId,
    entity::{Fee, TxInput, TxOutput, Ttl, Withdrawal},
    path::DerivationPath,
    plan::TxPlan,
    Error,
};

/// Body map keys
pub mod keys {
    pub const INPUTS: u64 = 0;
    pub const OUTPUTS: u64 = 1;
    pub const FEE: u64 = 2;
    pub const TTL: u64 = 3;
    pub const CERTIFICATES: u64 = 4;
    pub const WITHDRAWALS: u64 = 5;
}

/// Unsigned transaction body.
///
/// Immutable once built, the canonical encoding and identifier are
/// computed at build time.
#[derive(Clone, PartialEq, Debug)]
pub struct UnsignedTransactionBody {
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    fee: Fee,
    ttl: Ttl,
    certificates: Vec<Certificate>,
    withdrawals: Vec<Withdrawal>,

    encoded: Vec<u8>,
    id: TxId,
}

impl UnsignedTransactionBody {
    /// Start building a transaction body
    pub fn builder() -> TxBodyBuilder {
        TxBodyBuilder::default()
    }

    /// Build a body from a coin selection plan.
    ///
    /// `staking_path` overrides the staking key path used for change outputs
    /// and certificates, where absent this is resolved from the account of
    /// the change output (or first input, for certificates).
    pub fn from_plan(plan: &TxPlan, staking_path: Option<&DerivationPath>) -> Result<Self, Error> {
        let mut b = Self::builder().fee(plan.fee).ttl(plan.ttl);

        for i in &plan.inputs {
            b = b.input(TxInput::new(
                &i.id,
                i.index,
                i.amount,
                i.derivation_path.clone(),
            )?);
        }

        for o in &plan.outputs {
            b = b.output(TxOutput::new(
                &o.address,
                o.amount,
                o.derivation_path.clone(),
                staking_path.cloned(),
            )?);
        }

        for c in &plan.certificates {
            let signing_path = match (&c.signing_path, staking_path, plan.inputs.first()) {
                (Some(p), _, _) => p.clone(),
                (None, Some(p), _) => p.clone(),
                (None, None, Some(i)) => i.derivation_path.staking_path()?,
                (None, None, None) => {
                    return Err(Error::InvalidCertificate(
                        "no signing path for reward account".to_string(),
                    ))
                }
            };

            b = b.certificate(Certificate::new(
                c.certificate_type,
                &c.stake_address,
                c.pool_id.as_deref(),
                signing_path,
            )?);
        }

        for w in &plan.withdrawals {
            b = b.withdrawal(Withdrawal::new(&w.stake_address, w.amount)?);
        }

        b.build()
    }

    pub fn inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    pub fn fee(&self) -> Fee {
        self.fee
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    /// Canonical encoding of the body
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Content identifier (blake2b-256 of the canonical encoding)
    pub fn id(&self) -> TxId {
        self.id
    }

    /// Paths of every key required to witness this body (inputs then
    /// certificates), de-duplicated in first-seen order
    pub fn signing_paths(&self) -> Vec<DerivationPath> {
        let mut paths: Vec<DerivationPath> = vec![];

        let all = self
            .inputs
            .iter()
            .map(|i| i.path())
            .chain(self.certificates.iter().map(|c| c.signing_path()));

        for p in all {
            if !paths.contains(p) {
                paths.push(p.clone());
            }
        }

        paths
    }

    fn map_len(&self) -> usize {
        4 + usize::from(!self.certificates.is_empty()) + usize::from(!self.withdrawals.is_empty())
    }
}

impl Serialize for UnsignedTransactionBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.map_len()))?;

        m.serialize_entry(&keys::INPUTS, &Seq(&self.inputs))?;
        m.serialize_entry(&keys::OUTPUTS, &Seq(&self.outputs))?;
        m.serialize_entry(&keys::FEE, &self.fee)?;
        m.serialize_entry(&keys::TTL, &self.ttl)?;

        if !self.certificates.is_empty() {
            m.serialize_entry(&keys::CERTIFICATES, &Seq(&self.certificates))?;
        }

        if !self.withdrawals.is_empty() {
            m.serialize_entry(&keys::WITHDRAWALS, &Withdrawals(&self.withdrawals))?;
        }

        m.end()
    }
}

/// Withdrawal map, `{ reward_address_bytes => amount }` (pre-sorted by address)
struct Withdrawals<'a>(&'a [Withdrawal]);

impl<'a> Serialize for Withdrawals<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.0.len()))?;
        for w in self.0 {
            m.serialize_entry(&Bytes(w.address_bytes()), &w.amount())?;
        }
        m.end()
    }
}

/// Builder for [UnsignedTransactionBody], field order in the encoding is
/// fixed by the key schema and independent of call order
#[derive(Clone, Debug, Default)]
pub struct TxBodyBuilder {
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    fee: Option<Fee>,
    ttl: Option<Ttl>,
    certificates: Vec<Certificate>,
    withdrawals: Vec<Withdrawal>,
}

impl TxBodyBuilder {
    pub fn input(mut self, i: TxInput) -> Self {
        self.inputs.push(i);
        self
    }

    pub fn output(mut self, o: TxOutput) -> Self {
        self.outputs.push(o);
        self
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = Some(Fee(fee));
        self
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(Ttl(ttl));
        self
    }

    pub fn certificate(mut self, c: Certificate) -> Self {
        self.certificates.push(c);
        self
    }

    pub fn withdrawal(mut self, w: Withdrawal) -> Self {
        self.withdrawals.push(w);
        self
    }

    /// Validate required fields, encode and identify the body
    pub fn build(self) -> Result<UnsignedTransactionBody, Error> {
        if self.inputs.is_empty() {
            return Err(Error::Encoding("transaction has no inputs".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(Error::Encoding("transaction has no outputs".to_string()));
        }
        let fee = self
            .fee
            .ok_or_else(|| Error::Encoding("transaction fee not set".to_string()))?;
        let ttl = self
            .ttl
            .ok_or_else(|| Error::Encoding("transaction ttl not set".to_string()))?;

        // Canonical map key order for withdrawals (length, then bytes)
        let mut withdrawals = self.withdrawals;
        withdrawals.sort_by(|a, b| {
            let (a, b) = (a.address_bytes(), b.address_bytes());
            (a.len(), a).cmp(&(b.len(), b))
        });
        if let Some(w) = withdrawals
            .windows(2)
            .find(|w| w[0].address_bytes() == w[1].address_bytes())
        {
            return Err(Error::Encoding(format!(
                "duplicate withdrawal for {}",
                w[0].reward_address()
            )));
        }

        let mut body = UnsignedTransactionBody {
            inputs: self.inputs,
            outputs: self.outputs,
            fee,
            ttl,
            certificates: self.certificates,
            withdrawals,
            encoded: vec![],
            id: TxId::from([0u8; 32]),
        };

        body.encoded = cbor::to_vec(&body)?;
        body.id = TxId::compute(&body.encoded);

        Ok(body)
    }
}
