//! Remote list synchronizer.
//!
//! Maintains the set-semantics call lists stored in customer metafields:
//! every mutation is a fetch-then-write round trip against Shopify
//! (read the current list, compute the new one, write it back, creating
//! the record on first add).
//!
//! # Consistency
//!
//! Shopify's metafield endpoints offer no compare-and-swap, so two writers
//! that interleave on the same (customer, namespace, key) can lose one
//! update: both fetch state S, both write their own S'. A per-coordinate
//! async mutex serializes operations from this process instance, which
//! narrows the window but cannot protect against other processes or direct
//! Admin API writes. That residual race is a known gap; no client-side
//! locking can close it and none is pretended here.
//!
//! No operation retries automatically, and a failed write is never reported
//! as success. All three operations are safe for callers to retry:
//! `fetch_list` never mutates, and the mutations are idempotent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

use callshelf_core::{CallId, CallList, CustomerId, DecodeError, codec};

use crate::shopify::{AdminClient, Metafield, ShopifyError};

/// Upper bound on the number of per-coordinate locks kept in memory.
///
/// Evicting an idle lock only widens the window back to the cross-process
/// race that exists regardless; it never affects correctness of completed
/// writes.
const LOCK_REGISTRY_CAPACITY: u64 = 1024;

/// Idle time after which a coordinate's lock may be dropped.
const LOCK_IDLE_TTL: Duration = Duration::from_secs(600);

/// The remote keyed store holding one encoded list per
/// (customer, namespace, key) coordinate.
///
/// [`AdminClient`] is the production implementation; tests substitute an
/// in-memory double.
pub trait MetafieldStore: Send + Sync {
    /// Fetch the record at a coordinate, `None` if it does not exist.
    fn fetch(
        &self,
        customer: &CustomerId,
        list: CallList,
    ) -> impl Future<Output = Result<Option<Metafield>, ShopifyError>> + Send;

    /// Create the record at a coordinate with an initial encoded value.
    fn create(
        &self,
        customer: &CustomerId,
        list: CallList,
        value: &str,
    ) -> impl Future<Output = Result<Metafield, ShopifyError>> + Send;

    /// Overwrite the encoded value of an existing record.
    fn update(
        &self,
        record_id: i64,
        value: &str,
    ) -> impl Future<Output = Result<Metafield, ShopifyError>> + Send;
}

impl MetafieldStore for AdminClient {
    async fn fetch(
        &self,
        customer: &CustomerId,
        list: CallList,
    ) -> Result<Option<Metafield>, ShopifyError> {
        self.get_metafield(customer, list.namespace(), list.key())
            .await
    }

    async fn create(
        &self,
        customer: &CustomerId,
        list: CallList,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        self.create_metafield(customer, list.namespace(), list.key(), value)
            .await
    }

    async fn update(&self, record_id: i64, value: &str) -> Result<Metafield, ShopifyError> {
        self.update_metafield(record_id, value).await
    }
}

/// Errors from list synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A removal was requested but no record exists at the coordinate.
    ///
    /// Distinct from "record exists but does not contain the item", which
    /// is a successful no-op. Stays `NotFound` on retry, which is correct.
    #[error("no {list} record exists for customer {customer}")]
    NotFound {
        customer: CustomerId,
        list: CallList,
    },

    /// The stored value does not parse under the canonical encoding.
    ///
    /// Surfaced as a data error rather than coerced to an empty list;
    /// silently reinterpreting a mis-encoded value is how lists got
    /// clobbered historically.
    #[error("stored {list} value for customer {customer} is corrupt: {source}")]
    Decode {
        customer: CustomerId,
        list: CallList,
        source: DecodeError,
    },

    /// Shopify rejected the configured credentials.
    #[error("authentication with Shopify failed: {0}")]
    Auth(String),

    /// The remote call failed in transit or at the API layer.
    #[error(transparent)]
    Transport(ShopifyError),
}

impl From<ShopifyError> for SyncError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Unauthorized(message) => Self::Auth(message),
            other => Self::Transport(other),
        }
    }
}

/// Synchronizer for the per-customer call lists.
pub struct ListSync<S> {
    store: S,
    locks: moka::future::Cache<(CustomerId, CallList), Arc<Mutex<()>>>,
}

impl<S: MetafieldStore> ListSync<S> {
    /// Create a synchronizer over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: moka::future::Cache::builder()
                .max_capacity(LOCK_REGISTRY_CAPACITY)
                .time_to_idle(LOCK_IDLE_TTL)
                .build(),
        }
    }

    /// Read the current list at a coordinate.
    ///
    /// An absent record and a record holding an empty list are equivalent:
    /// both read as `[]`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Decode` if the stored value is not the canonical
    /// encoding, or a transport/auth error from the remote call. Never
    /// mutates remote state.
    #[instrument(skip(self), fields(customer = %customer, list = %list))]
    pub async fn fetch_list(
        &self,
        customer: &CustomerId,
        list: CallList,
    ) -> Result<Vec<CallId>, SyncError> {
        match self.store.fetch(customer, list).await? {
            Some(record) => decode_record(customer, list, &record.value),
            None => Ok(Vec::new()),
        }
    }

    /// Add a call to a list, creating the record on first use.
    ///
    /// If the call is already present this is a no-op: the unchanged list
    /// is returned and no write is issued, so calling twice leaves the same
    /// remote state as calling once.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Decode` if the stored value is corrupt (the
    /// write is not attempted), or a transport/auth error from the remote
    /// calls.
    #[instrument(skip(self), fields(customer = %customer, list = %list, call = %call))]
    pub async fn add_to_list(
        &self,
        customer: &CustomerId,
        list: CallList,
        call: &CallId,
    ) -> Result<Vec<CallId>, SyncError> {
        let _guard = self.lock(customer, list).await;

        let record = self.store.fetch(customer, list).await?;
        let mut current = match &record {
            Some(r) => decode_record(customer, list, &r.value)?,
            None => Vec::new(),
        };

        if current.contains(call) {
            return Ok(current);
        }

        current.push(call.clone());
        let encoded = codec::encode_call_ids(&current);

        match record {
            Some(r) => {
                self.store.update(r.id, &encoded).await?;
            }
            None => {
                self.store.create(customer, list, &encoded).await?;
            }
        }

        Ok(current)
    }

    /// Remove all occurrences of a call from a list.
    ///
    /// A missing record is `SyncError::NotFound`; a record that simply does
    /// not contain the call is a successful no-op with no write. Removing
    /// the last item keeps the record alive holding an empty list.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NotFound` if no record exists at the coordinate,
    /// `SyncError::Decode` for a corrupt stored value, or a transport/auth
    /// error from the remote calls.
    #[instrument(skip(self), fields(customer = %customer, list = %list, call = %call))]
    pub async fn remove_from_list(
        &self,
        customer: &CustomerId,
        list: CallList,
        call: &CallId,
    ) -> Result<Vec<CallId>, SyncError> {
        let _guard = self.lock(customer, list).await;

        let Some(record) = self.store.fetch(customer, list).await? else {
            return Err(SyncError::NotFound {
                customer: customer.clone(),
                list,
            });
        };

        let current = decode_record(customer, list, &record.value)?;
        let remaining: Vec<CallId> = current.iter().filter(|id| *id != call).cloned().collect();

        if remaining.len() == current.len() {
            return Ok(remaining);
        }

        self.store
            .update(record.id, &codec::encode_call_ids(&remaining))
            .await?;

        Ok(remaining)
    }

    /// Acquire this process's lock for a coordinate, holding it across the
    /// fetch-then-write round trip.
    async fn lock(&self, customer: &CustomerId, list: CallList) -> tokio::sync::OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .get_with((customer.clone(), list), async { Arc::new(Mutex::new(())) })
            .await;
        mutex.lock_owned().await
    }
}

fn decode_record(
    customer: &CustomerId,
    list: CallList,
    value: &str,
) -> Result<Vec<CallId>, SyncError> {
    codec::decode_call_ids(value).map_err(|source| SyncError::Decode {
        customer: customer.clone(),
        list,
        source,
    })
}
