#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use log::LevelFilter;
use simplelog::SimpleLogger;

use ledger_ada::{
    tx::{digest::blake2b_256, DerivationPath, TxId, Witness},
    device::SigningRequest,
    DerivationScheme, DeviceWitness, Error, ExtendedPublicKey, KeyDeriver, SignerResponse,
    TransactionSigner,
};

pub fn setup() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Seed for a child of the provided parent public key
fn child_seed(parent: &[u8; 32], index: u32) -> [u8; 32] {
    let mut b = parent.to_vec();
    b.extend_from_slice(&index.to_be_bytes());
    blake2b_256(&b)
}

/// Signing key held by the mock device for a path, mirroring [MockDeriver]
pub fn signing_key(path: &DerivationPath) -> SigningKey {
    match (path.is_hardened(), path.parent(), path.last()) {
        (false, Some(parent), Some(index)) => {
            let parent = signing_key(&parent).verifying_key().to_bytes();
            SigningKey::from_bytes(&child_seed(&parent, index))
        }
        _ => SigningKey::from_bytes(&blake2b_256(path.to_string().as_bytes())),
    }
}

fn extended(k: &SigningKey) -> ExtendedPublicKey {
    let public_key = k.verifying_key().to_bytes();
    ExtendedPublicKey::new(public_key, blake2b_256(&public_key))
}

/// Key deriver counting invocations per path
#[derive(Default)]
pub struct MockDeriver {
    pub hardened: AtomicUsize,
    pub children: AtomicUsize,
    pub calls: Mutex<HashMap<String, usize>>,
    /// Hardened paths that fail to derive
    pub fail: Mutex<HashSet<String>>,
    /// Delay applied to each derivation
    pub delay: Duration,
}

impl MockDeriver {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Number of derivations of the provided path
    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.hardened.load(Ordering::SeqCst) + self.children.load(Ordering::SeqCst)
    }

    pub fn fail(&self, path: &str) {
        self.fail.lock().unwrap().insert(path.to_string());
    }

    pub fn recover(&self, path: &str) {
        self.fail.lock().unwrap().remove(path);
    }

    fn record(&self, key: String) {
        *self.calls.lock().unwrap().entry(key).or_default() += 1;
    }
}

#[async_trait]
impl KeyDeriver for MockDeriver {
    async fn derive_hardened(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error> {
        self.hardened.fetch_add(1, Ordering::SeqCst);
        self.record(path.to_string());

        tokio::time::sleep(self.delay).await;

        if self.fail.lock().unwrap().contains(&path.to_string()) {
            return Err(Error::KeyDerivation(format!("no key material for {path}")));
        }

        Ok(extended(&signing_key(path)))
    }

    async fn derive_child(
        &self,
        parent: &ExtendedPublicKey,
        index: u32,
        _scheme: DerivationScheme,
    ) -> Result<ExtendedPublicKey, Error> {
        self.children.fetch_add(1, Ordering::SeqCst);
        self.record(format!("{}/{}", hex::encode(parent.public_key), index));

        tokio::time::sleep(self.delay).await;

        let k = SigningKey::from_bytes(&child_seed(&parent.public_key, index));
        Ok(extended(&k))
    }
}

/// Mock device behaviour
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Mode {
    Honest,
    WrongDigest,
    DropWitness,
    ExtraWitness,
    BadSignature,
    Hang,
}

/// Signing device holding keys for every path, signing the configured id
pub struct MockSigner {
    pub id: TxId,
    pub mode: Mode,
    pub requests: usize,
}

impl MockSigner {
    pub fn new(id: TxId, mode: Mode) -> Self {
        Self {
            id,
            mode,
            requests: 0,
        }
    }
}

/// Paths the device signs with for a request, inputs then certificates
pub fn request_paths(req: &SigningRequest) -> Vec<DerivationPath> {
    let mut paths: Vec<DerivationPath> = vec![];

    let all = req
        .inputs
        .iter()
        .map(|i| DerivationPath::from(i.signing_path.clone()))
        .chain(
            req.certificates
                .iter()
                .map(|c| DerivationPath::from_str(&c.path).unwrap()),
        );

    for p in all {
        if !paths.contains(&p) {
            paths.push(p);
        }
    }

    paths
}

fn witness(k: &SigningKey, id: &TxId) -> DeviceWitness {
    let sig = k.sign(id.as_bytes());
    DeviceWitness::from(&Witness::new(k.verifying_key().to_bytes(), sig.to_bytes()))
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn sign(&mut self, req: &SigningRequest) -> Result<SignerResponse, Error> {
        self.requests += 1;

        if self.mode == Mode::Hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        let mut witnesses: Vec<_> = request_paths(req)
            .iter()
            .map(|p| witness(&signing_key(p), &self.id))
            .collect();

        let mut id = self.id;

        match self.mode {
            Mode::WrongDigest => id = TxId::from([0xff; 32]),
            Mode::DropWitness => {
                witnesses.pop();
            }
            Mode::ExtraWitness => {
                let k = SigningKey::from_bytes(&[0x42; 32]);
                witnesses.push(witness(&k, &self.id));
            }
            Mode::BadSignature => {
                let k = signing_key(&DerivationPath::from(req.inputs[0].signing_path.clone()));
                let sig = k.sign(b"some other message");
                witnesses[0].signature_hex = hex::encode(sig.to_bytes());
            }
            Mode::Honest | Mode::Hang => (),
        }

        Ok(SignerResponse {
            tx_hash_hex: id.to_hex(),
            witnesses,
        })
    }
}
