// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Canonical CBOR helpers
//!
//! All encoders in this crate emit definite-length maps and arrays via
//! `serialize_map(Some(n))` / `serialize_tuple(n)` so identical logical
//! content always produces identical bytes.

use serde::{ser::SerializeSeq, Serialize, Serializer};

use crate::Error;

/// Byte string wrapper, serialised as a CBOR byte string (major type 2)
/// rather than an array of integers
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Bytes<'a>(pub &'a [u8]);

impl<'a> Serialize for Bytes<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

/// Definite-length sequence of serialisable items
pub struct Seq<'a, T>(pub &'a [T]);

impl<'a, T: Serialize> Serialize for Seq<'a, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_seq(Some(self.0.len()))?;
        for v in self.0 {
            s.serialize_element(v)?;
        }
        s.end()
    }
}

/// Encode a value to canonical CBOR bytes
pub fn to_vec(v: &impl Serialize) -> Result<Vec<u8>, Error> {
    Ok(serde_cbor::to_vec(v)?)
}
