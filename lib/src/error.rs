// Copyright (c) 2022-2023 The MobileCoin Foundation

use tokio::time::error::Elapsed;

/// Ledger Cardano API Error Type
///
/// Errors are [Clone] so a single failed derivation can be delivered to
/// every caller awaiting the same path.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    /// Transaction core error
    #[error(transparent)]
    Core(#[from] ledger_ada_core::Error),

    /// External derivation primitive failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// External signer failed or rejected the request
    #[error("Signer error: {0}")]
    Signer(String),

    /// Timeout waiting for user
    #[error("Timeout waiting for user interaction")]
    UserTimeout,

    /// Request timeout
    #[error("Timeout waiting for device response")]
    RequestTimeout,

    /// Device computed a different transaction id
    #[error("Mismatch in transaction digest (local: {0}, device: {1})")]
    DigestMismatch(String, String),

    /// No witness returned for a required signing path
    #[error("Missing witness for path {0}")]
    MissingWitness(String),

    /// Witness public key does not belong to any required signing path
    #[error("Unexpected witness for public key {0}")]
    UnexpectedWitness(String),

    /// Witness signature does not verify over the transaction id
    #[error("Invalid signature for public key {0}")]
    InvalidSignature(String),
}

impl From<Elapsed> for Error {
    fn from(_: Elapsed) -> Self {
        Error::RequestTimeout
    }
}
