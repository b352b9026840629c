// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ledger Cardano API Library (and CLI)
//!
//! A [SigningSession] builds canonical transaction bodies from a
//! [TxPlan][tx::plan::TxPlan], requests witnesses from a
//! [TransactionSigner] and verifies these against public keys resolved
//! via a per-session [DerivationCache].

// async traits not yet safe to use
// see https://github.com/rust-lang/rust/issues/91611
// #![feature(async_fn_in_trait)]

/// Re-export `ledger-ada-core` for consumers
pub use ledger_ada_core::{self as tx};

/// Re-export `ledger-ada-device` for consumers
pub use ledger_ada_device::{self as device};

pub mod cache;
pub use cache::DerivationCache;

mod config;
pub use config::SessionConfig;

pub mod deriver;
pub use deriver::{DerivationScheme, ExtendedPublicKey, KeyDeriver};

mod error;
pub use error::Error;

mod session;
pub use session::SigningSession;

pub mod signer;
pub use signer::{DeviceWitness, SignerResponse, TransactionSigner};
