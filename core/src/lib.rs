// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Cardano hardware wallet transaction core
//!
//! This provides the pure (synchronous, allocation only) half of preparing
//! a transaction for signing on a hardware wallet: derivation path handling,
//! transaction entities, the canonical body encoding and identifier, and
//! assembly of the final signed payload.
//!
//! ## Building a transaction
//!
//! 1. Obtain a [TxPlan][plan::TxPlan] from coin selection
//! 2. Build an [UnsignedTransactionBody][body::UnsignedTransactionBody] via
//!    [`from_plan`][body::UnsignedTransactionBody::from_plan] or the
//!    [TxBodyBuilder][body::TxBodyBuilder]
//! 3. Fetch the body [TxId][digest::TxId], which the signing device
//!    independently recomputes and displays
//! 4. Collect [Witness][entity::Witness]es from the device into a
//!    [WitnessSet][signed::WitnessSet]
//! 5. Assemble a [SignedTransaction][signed::SignedTransaction] and encode
//!    it for submission
//!
//! All encodings are definite-length CBOR, such that identical logical
//! content always produces identical bytes (and thus identifiers).

pub mod address;

pub mod body;
pub use body::{TxBodyBuilder, UnsignedTransactionBody};

pub mod cbor;

pub mod certificate;
pub use certificate::{Certificate, CertificateType};

pub mod digest;
pub use digest::TxId;

pub mod entity;
pub use entity::{encode, Fee, TxEntity, TxInput, TxOutput, Ttl, Withdrawal, Witness};

mod error;
pub use error::Error;

pub mod path;
pub use path::{DerivationPath, Hardness};

pub mod plan;

pub mod signed;
pub use signed::{SignedTransaction, WitnessSet};
