// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Derivation path codec
//!
//! Converts between human path notation (`m/1852'/1815'/0'/0/0`), raw index
//! sequences and the representations expected by the signing device.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

use crate::Error;

/// Offset applied to hardened derivation indices
pub const HARDENED: u32 = 0x8000_0000;

/// Shelley purpose (CIP-1852)
pub const PURPOSE_SHELLEY: u32 = 1852;

/// SLIP-0044 coin type for ADA
pub const COIN_TYPE_ADA: u32 = 1815;

/// Role index of the staking key within an account
pub const ROLE_STAKING: u32 = 2;

/// Apply the hardened offset to an index
pub const fn harden(index: u32) -> u32 {
    index | HARDENED
}

/// Derivation index classification
#[derive(Copy, Clone, PartialEq, Eq, Debug, StrumDisplay)]
pub enum Hardness {
    Hardened,
    NonHardened,
}

/// Classify a single derivation index
pub const fn classify(index: u32) -> Hardness {
    if index >= HARDENED {
        Hardness::Hardened
    } else {
        Hardness::NonHardened
    }
}

/// Absolute derivation path, an immutable sequence of 32-bit indices
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PathRepr", into = "Vec<u32>")]
pub struct DerivationPath(Vec<u32>);

/// Accepted serialised forms for [DerivationPath]
#[derive(Deserialize)]
#[serde(untagged)]
enum PathRepr {
    Indices(Vec<i64>),
    Text(String),
}

impl TryFrom<PathRepr> for DerivationPath {
    type Error = Error;

    fn try_from(r: PathRepr) -> Result<Self, Self::Error> {
        match r {
            PathRepr::Indices(v) => Self::from_raw(v),
            PathRepr::Text(s) => Self::from_str(&s),
        }
    }
}

impl From<DerivationPath> for Vec<u32> {
    fn from(p: DerivationPath) -> Self {
        p.0
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(v: Vec<u32>) -> Self {
        Self(v)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(v: &[u32]) -> Self {
        Self(v.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for DerivationPath {
    fn from(v: [u32; N]) -> Self {
        Self(v.to_vec())
    }
}

impl DerivationPath {
    /// The empty (master key) path
    pub const fn master() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw (possibly signed / wide) indices, rejecting
    /// negative values and values that do not fit in 32 bits
    pub fn from_raw(raw: impl IntoIterator<Item = i64>) -> Result<Self, Error> {
        raw.into_iter()
            .map(|i| {
                u32::try_from(i).map_err(|_| Error::InvalidPath(format!("index out of range: {i}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Shelley account path `1852'/1815'/account'`
    pub fn account(account: u32) -> Self {
        Self(vec![
            harden(PURPOSE_SHELLEY),
            harden(COIN_TYPE_ADA),
            harden(account),
        ])
    }

    /// Raw indices
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final index, if any
    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// Path with the final index removed, `None` for the master path
    pub fn parent(&self) -> Option<Self> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Path extended by one index
    pub fn child(&self, index: u32) -> Self {
        let mut v = self.0.clone();
        v.push(index);
        Self(v)
    }

    /// Hardness of a path is governed by its last index, the empty
    /// (master) path is hardened
    pub fn hardness(&self) -> Hardness {
        match self.last() {
            Some(i) => classify(i),
            None => Hardness::Hardened,
        }
    }

    pub fn is_hardened(&self) -> bool {
        self.hardness() == Hardness::Hardened
    }

    /// Staking key path for the account containing this path
    /// (`purpose'/coin'/account'/2/0`)
    pub fn staking_path(&self) -> Result<Self, Error> {
        if self.0.len() < 3 {
            return Err(Error::InvalidPath(format!("no account level in path {self}")));
        }

        Ok(Self(vec![self.0[0], self.0[1], self.0[2], ROLE_STAKING, 0]))
    }

    /// Index array as consumed by the signing device
    pub fn to_device_path(&self) -> Vec<u32> {
        self.0.clone()
    }

    /// Path string as consumed by the signing device (no `m/` prefix)
    pub fn to_device_string(&self) -> String {
        self.0
            .iter()
            .map(|i| fmt_index(*i))
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn fmt_index(i: u32) -> String {
    match classify(i) {
        Hardness::Hardened => format!("{}'", i - HARDENED),
        Hardness::NonHardened => format!("{i}"),
    }
}

/// Canonical string form, also used as the derivation cache key
impl Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for i in &self.0 {
            write!(f, "/{}", fmt_index(*i))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let body = match s.strip_prefix('m') {
            Some(r) => r.strip_prefix('/').unwrap_or(r),
            None => s,
        };

        if body.is_empty() {
            return Ok(Self::master());
        }

        let mut v = vec![];
        for c in body.split('/') {
            let (n, hardened) = match c.strip_suffix(['\'', 'h', 'H']) {
                Some(n) => (n, true),
                None => (c, false),
            };

            let i: u32 = n
                .parse()
                .map_err(|_| Error::InvalidPath(format!("invalid component '{c}' in '{s}'")))?;

            match (hardened, classify(i)) {
                (true, Hardness::Hardened) => {
                    return Err(Error::InvalidPath(format!(
                        "hardened component '{c}' out of range"
                    )))
                }
                (true, Hardness::NonHardened) => v.push(harden(i)),
                (false, _) => v.push(i),
            }
        }

        Ok(Self(v))
    }
}
