// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Transaction core errors
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    /// Malformed derivation path or index (negative, wider than 32 bits, or bad notation)
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Address could not be decoded by the address codec
    #[error("address decode failed: {0}")]
    AddressDecode(String),

    /// Unknown certificate type or missing certificate field
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Body missing a required field, or value could not be encoded
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Byte value of unexpected length
    #[error("invalid length (actual: {0}, expected: {1})")]
    InvalidLength(usize, usize),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidHex(e.to_string())
    }
}

impl From<serde_cbor::Error> for Error {
    fn from(e: serde_cbor::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}
