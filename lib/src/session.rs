// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signing session for a single wallet
//!
//! This builds the unsigned body, hands the prepared request to the
//! signing device, checks the returned id and witnesses, and assembles
//! the signed transaction.

use std::{collections::HashSet, sync::Arc};

use ed25519_dalek::{Signature, VerifyingKey};
use futures::future::try_join_all;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use ledger_ada_core::{
    plan::TxPlan, DerivationPath, SignedTransaction, TxId, UnsignedTransactionBody, Witness,
    WitnessSet,
};
use ledger_ada_device::SigningRequest;

use crate::{
    cache::DerivationCache,
    config::SessionConfig,
    deriver::{ExtendedPublicKey, KeyDeriver},
    signer::TransactionSigner,
    Error,
};

/// Signing session, owning the derivation cache for one wallet
pub struct SigningSession<D: KeyDeriver, S: TransactionSigner> {
    config: SessionConfig,
    cache: DerivationCache<D>,
    signer: Arc<Mutex<S>>,
}

impl<D: KeyDeriver, S: TransactionSigner> SigningSession<D, S> {
    /// Create a new session with the provided derivation and signing
    /// capabilities
    pub fn new(config: SessionConfig, deriver: D, signer: S) -> Self {
        Self {
            cache: DerivationCache::new(deriver, config.scheme),
            config,
            signer: Arc::new(Mutex::new(signer)),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cache(&self) -> &DerivationCache<D> {
        &self.cache
    }

    /// Fetch the extended public key for a path (cached)
    pub async fn public_key(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error> {
        let k = tokio::time::timeout(self.config.request_timeout(), self.cache.derive(path))
            .await??;

        Ok(k)
    }

    /// Build the unsigned body for a plan
    pub fn build(&self, plan: &TxPlan) -> Result<UnsignedTransactionBody, Error> {
        let body = UnsignedTransactionBody::from_plan(plan, self.config.staking_path.as_ref())?;

        debug!(
            "Built body {} ({} inputs, {} outputs, {} certificates, {} withdrawals)",
            body.id(),
            body.inputs().len(),
            body.outputs().len(),
            body.certificates().len(),
            body.withdrawals().len()
        );

        Ok(body)
    }

    /// Prepare the device request for a body
    pub fn prepare(&self, body: &UnsignedTransactionBody) -> SigningRequest {
        SigningRequest::new(self.config.network(), body)
    }

    /// Build and sign a plan
    pub async fn sign(&self, plan: &TxPlan) -> Result<SignedTransaction, Error> {
        let body = self.build(plan)?;
        self.sign_body(body).await
    }

    /// Sign a body, returning the assembled transaction once every
    /// required witness is present and valid
    pub async fn sign_body(
        &self,
        body: UnsignedTransactionBody,
    ) -> Result<SignedTransaction, Error> {
        let id = body.id();
        let req = self.prepare(&body);

        // Resolve required keys while the device is busy with the user
        let paths = body.signing_paths();
        let keys = try_join_all(paths.iter().map(|p| self.public_key(p)));

        info!("Requesting signature for transaction {}", id);

        let signer = self.signer.clone();
        let user_timeout = self.config.user_timeout();
        let resp = async move {
            let mut s = signer.lock().await;
            match tokio::time::timeout(user_timeout, s.sign(&req)).await {
                Ok(r) => r,
                Err(_) => Err(Error::UserTimeout),
            }
        };

        let (keys, resp) = futures::future::try_join(keys, resp).await?;

        // Device must approve the same id we computed
        let device_id = TxId::from_hex(&resp.tx_hash_hex)?;
        if device_id != id {
            warn!("Device digest {} does not match {}", device_id, id);
            return Err(Error::DigestMismatch(id.to_hex(), device_id.to_hex()));
        }

        let witnesses = resp
            .witnesses
            .iter()
            .map(Witness::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let witnesses = verify_witnesses(&id, &paths, &keys, witnesses)?;

        debug!("Collected {} witnesses for {}", witnesses.len(), id);

        Ok(SignedTransaction::new(body, witnesses))
    }

    /// Close the session, dropping cached keys
    pub async fn close(&self) {
        debug!("Closing signing session");

        self.cache.clear().await;
    }
}

/// Check every witness belongs to a required path and verifies over the
/// transaction id, and every required path is witnessed
fn verify_witnesses(
    id: &TxId,
    paths: &[DerivationPath],
    keys: &[ExtendedPublicKey],
    witnesses: Vec<Witness>,
) -> Result<WitnessSet, Error> {
    let required: HashSet<[u8; 32]> = keys.iter().map(|k| k.public_key).collect();

    for w in &witnesses {
        let pk = hex::encode(w.public_key);

        if !required.contains(&w.public_key) {
            return Err(Error::UnexpectedWitness(pk));
        }

        let key = VerifyingKey::from_bytes(&w.public_key)
            .map_err(|_| Error::InvalidSignature(pk.clone()))?;
        let sig = Signature::from_bytes(&w.signature);

        key.verify_strict(id.as_bytes(), &sig)
            .map_err(|_| Error::InvalidSignature(pk))?;
    }

    for (k, path) in keys.iter().zip(paths) {
        if !witnesses.iter().any(|w| w.public_key == k.public_key) {
            return Err(Error::MissingWitness(path.to_string()));
        }
    }

    Ok(witnesses.into_iter().collect())
}
