// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Address codec helpers (bech32 encode / decode only)

use bech32::{FromBase32, ToBase32, Variant};

use crate::Error;

/// Length of a key / script hash credential
pub const CREDENTIAL_LEN: usize = 28;

/// Decode a bech32 address to its raw bytes (header byte included)
pub fn decode(address: &str) -> Result<Vec<u8>, Error> {
    let (_hrp, data, _variant) =
        bech32::decode(address).map_err(|e| Error::AddressDecode(format!("{address}: {e}")))?;

    let raw = Vec::<u8>::from_base32(&data)
        .map_err(|e| Error::AddressDecode(format!("{address}: {e}")))?;
    if raw.is_empty() {
        return Err(Error::AddressDecode(format!("{address}: empty address")));
    }

    Ok(raw)
}

/// Encode raw address bytes as bech32 with the provided human readable part
pub fn encode(hrp: &str, bytes: &[u8]) -> Result<String, Error> {
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| Error::AddressDecode(format!("encode '{hrp}': {e}")))
}

/// Raw credential hash for a reward (account) address, the decoded
/// address with its header byte dropped
pub fn stake_credential(reward_address: &str) -> Result<[u8; CREDENTIAL_LEN], Error> {
    let raw = decode(reward_address)?;

    match raw.split_first() {
        Some((_header, hash)) if hash.len() == CREDENTIAL_LEN => {
            let mut b = [0u8; CREDENTIAL_LEN];
            b.copy_from_slice(hash);
            Ok(b)
        }
        _ => Err(Error::AddressDecode(format!(
            "{reward_address}: expected {} byte reward address, found {}",
            CREDENTIAL_LEN + 1,
            raw.len()
        ))),
    }
}
