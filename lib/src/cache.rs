// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Extended public key derivation cache
//!
//! Each path is in one of three states: absent, in progress (a spawned
//! derivation task whose result every caller for that path shares), or
//! done. Claiming a path happens under the cache lock, while derivation
//! runs outside it so unrelated paths proceed in parallel.
//!
//! Derivation tasks run to completion and publish their result whether
//! or not any caller is still waiting.
//!
//! Non-hardened paths resolve their parent through the same cache, so
//! common ancestors are derived once and shared between callers. A
//! failed derivation clears its own slot along with any in-progress
//! non-hardened descendants, which would otherwise fail on the same
//! result.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use tokio::sync::Mutex;

use ledger_ada_core::{DerivationPath, Hardness};

use crate::{
    deriver::{DerivationScheme, ExtendedPublicKey, KeyDeriver},
    Error,
};

type Pending = Shared<BoxFuture<'static, Result<ExtendedPublicKey, Error>>>;

enum Slot {
    InProgress { generation: u64, pending: Pending },
    Done(ExtendedPublicKey),
}

struct Inner<D> {
    deriver: D,
    scheme: DerivationScheme,
    slots: Mutex<HashMap<String, Slot>>,
    generation: AtomicU64,
}

/// Derivation cache, scoped to a single signing session.
///
/// Cloning shares the underlying cache.
pub struct DerivationCache<D: KeyDeriver> {
    inner: Arc<Inner<D>>,
}

impl<D: KeyDeriver> Clone for DerivationCache<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: KeyDeriver> DerivationCache<D> {
    /// Create a new cache using the provided derivation primitives
    pub fn new(deriver: D, scheme: DerivationScheme) -> Self {
        Self {
            inner: Arc::new(Inner {
                deriver,
                scheme,
                slots: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn deriver(&self) -> &D {
        &self.inner.deriver
    }

    pub fn scheme(&self) -> DerivationScheme {
        self.inner.scheme
    }

    /// Fetch the extended public key for `path`, deriving it (and any
    /// uncached ancestors) at most once
    pub async fn derive(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error> {
        let key = path.to_string();

        let pending = {
            let mut slots = self.inner.slots.lock().await;

            match slots.get(&key) {
                Some(Slot::Done(k)) => return Ok(*k),
                Some(Slot::InProgress { pending, .. }) => pending.clone(),
                None => {
                    let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
                    let task = tokio::spawn(self.clone().compute(
                        path.clone(),
                        key.clone(),
                        generation,
                    ));
                    let pending = async move {
                        task.await.unwrap_or_else(|e| {
                            Err(Error::KeyDerivation(format!("derivation task failed: {e}")))
                        })
                    }
                    .boxed()
                    .shared();

                    slots.insert(
                        key,
                        Slot::InProgress {
                            generation,
                            pending: pending.clone(),
                        },
                    );

                    pending
                }
            }
        };

        pending.await
    }

    /// Fetch a completed key without deriving
    pub async fn get(&self, path: &DerivationPath) -> Option<ExtendedPublicKey> {
        match self.inner.slots.lock().await.get(&path.to_string()) {
            Some(Slot::Done(k)) => Some(*k),
            _ => None,
        }
    }

    /// Number of completed entries
    pub async fn len(&self) -> usize {
        self.inner
            .slots
            .lock()
            .await
            .values()
            .filter(|s| matches!(s, Slot::Done(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of derivations in progress
    pub async fn in_progress(&self) -> usize {
        self.inner
            .slots
            .lock()
            .await
            .values()
            .filter(|s| matches!(s, Slot::InProgress { .. }))
            .count()
    }

    /// Drop all entries. In-flight derivations still resolve for their
    /// current waiters but are not published.
    pub async fn clear(&self) {
        let mut slots = self.inner.slots.lock().await;

        debug!("Clearing derivation cache ({} entries)", slots.len());

        slots.clear();
    }

    /// Derive then publish the result for the claimed slot
    fn compute(
        self,
        path: DerivationPath,
        key: String,
        generation: u64,
    ) -> BoxFuture<'static, Result<ExtendedPublicKey, Error>> {
        async move {
            let r = self.resolve(&path).await;

            let mut slots = self.inner.slots.lock().await;

            // Only publish into the slot this derivation claimed
            let claimed = matches!(
                slots.get(&key),
                Some(Slot::InProgress { generation: g, .. }) if *g == generation
            );
            if claimed {
                match &r {
                    Ok(k) => {
                        slots.insert(key, Slot::Done(*k));
                    }
                    Err(e) => {
                        debug!("Derivation of {} failed: {}", key, e);

                        slots.remove(&key);
                        slots.retain(|k, s| {
                            !(matches!(s, Slot::InProgress { .. }) && depends_on(k, &key))
                        });
                    }
                }
            }

            r
        }
        .boxed()
    }

    async fn resolve(&self, path: &DerivationPath) -> Result<ExtendedPublicKey, Error> {
        match (path.hardness(), path.parent(), path.last()) {
            (Hardness::NonHardened, Some(parent), Some(index)) => {
                let parent = self.derive(&parent).await?;

                self.inner
                    .deriver
                    .derive_child(&parent, index, self.inner.scheme)
                    .await
            }
            _ => self.inner.deriver.derive_hardened(path).await,
        }
    }
}

/// Whether `path` is derived from `ancestor` by non-hardened steps only
fn depends_on(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .and_then(|r| r.strip_prefix('/'))
        .map_or(false, |r| !r.contains('\''))
}
