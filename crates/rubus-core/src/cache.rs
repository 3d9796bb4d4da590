// Shared TTL cache over the ubus client.
//
// Several consumers (sensors, trackers, diagnostics) poll the same router
// on their own schedules; the cache collapses those into at most one RPC
// per category per freshness interval. Concurrent requests for one
// category coalesce on a per-category lock: whoever holds it fetches, the
// waiters find a fresh slot when they acquire it and return the cached
// value without touching the network.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use rubus_api::RpcCall;
use rubus_api::parse::WirelessBackend;

use crate::category::DataCategory;
use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::pool::{ClientKind, ClientPool};

/// One category's cached state. Guarded by a per-category async mutex
/// that is held across the refetch, which is what makes concurrent
/// requests coalesce.
#[derive(Default)]
pub(crate) struct Slot {
    pub(crate) value: Option<Value>,
    fetched_at: Option<Instant>,
}

impl Slot {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        matches!(self.fetched_at, Some(at) if now.duration_since(at) < ttl)
    }

    pub(crate) fn store(&mut self, value: Value, now: Instant) {
        self.value = Some(value);
        self.fetched_at = Some(now);
    }
}

/// Shared, per-router data cache.
///
/// Cheap to share behind an `Arc`; all interior state is synchronized.
pub struct DataCache {
    pub(crate) pool: ClientPool,
    pub(crate) backend: WirelessBackend,
    intervals: DashMap<DataCategory, Duration>,
    entries: DashMap<DataCategory, Arc<Mutex<Slot>>>,
}

impl DataCache {
    pub fn new(config: RouterConfig) -> Self {
        let intervals = DashMap::new();
        for (category, interval) in &config.intervals {
            intervals.insert(*category, *interval);
        }
        let backend = config.wireless_backend;
        Self {
            pool: ClientPool::new(config),
            backend,
            intervals,
            entries: DashMap::new(),
        }
    }

    /// Current freshness interval for `category`.
    pub fn update_interval(&self, category: DataCategory) -> Duration {
        self.intervals
            .get(&category)
            .map_or_else(|| category.default_interval(), |i| *i)
    }

    /// Override the freshness interval for `category`. Takes effect on
    /// the next request; already-cached values are re-judged against the
    /// new interval.
    pub fn set_update_interval(&self, category: DataCategory, interval: Duration) {
        self.intervals.insert(category, interval);
    }

    fn slot(&self, category: DataCategory) -> Arc<Mutex<Slot>> {
        Arc::clone(
            &self
                .entries
                .entry(category)
                .or_insert_with(|| Arc::new(Mutex::new(Slot::default()))),
        )
    }

    /// Get `category`'s data, refetching if the cached value is older
    /// than its interval.
    ///
    /// On a failed refetch the previous value is served stale with a
    /// warning; [`CoreError::UpdateFailed`] is raised only when there is
    /// nothing to fall back to.
    pub async fn get_data(&self, category: DataCategory) -> Result<Value, CoreError> {
        let slot = self.slot(category);
        let mut slot = slot.lock().await;

        let now = Instant::now();
        if slot.is_fresh(self.update_interval(category), now) {
            if let Some(value) = &slot.value {
                return Ok(value.clone());
            }
        }

        match self.fetch(category).await {
            Ok(value) => {
                debug!(%category, "cache refreshed");
                slot.store(value.clone(), now);
                Ok(value)
            }
            Err(source) => match &slot.value {
                Some(stale) => {
                    warn!(%category, error = %source, "refresh failed, serving stale data");
                    Ok(stale.clone())
                }
                None => Err(CoreError::UpdateFailed {
                    category,
                    source: Box::new(source),
                }),
            },
        }
    }

    /// Get several categories in one request, as an object keyed by
    /// category name.
    ///
    /// When both [`DataCategory::SystemInfo`] and
    /// [`DataCategory::SystemBoard`] are stale, the pair is refreshed in a
    /// single batched RPC instead of two. Categories that fail without a
    /// stale fallback are omitted from the result with a warning; auth
    /// failures abort the whole request so pollers stop rather than spin.
    pub async fn get_combined_data(
        &self,
        categories: &[DataCategory],
    ) -> Result<Value, CoreError> {
        let mut out = Map::new();

        let system_pair = categories.contains(&DataCategory::SystemInfo)
            && categories.contains(&DataCategory::SystemBoard);
        if system_pair {
            self.refresh_system_pair(&mut out).await?;
        }

        for &category in categories {
            if system_pair
                && matches!(
                    category,
                    DataCategory::SystemInfo | DataCategory::SystemBoard
                )
            {
                continue;
            }
            match self.get_data(category).await {
                Ok(value) => {
                    out.insert(category.to_string(), value);
                }
                Err(e) if e.is_auth_failure() => return Err(e),
                Err(e) => {
                    warn!(%category, error = %e, "category unavailable, omitting");
                }
            }
        }

        Ok(Value::Object(out))
    }

    /// Refresh `system_info` and `system_board` together, sharing one
    /// round trip when both need it. Slots are locked in a fixed order.
    async fn refresh_system_pair(&self, out: &mut Map<String, Value>) -> Result<(), CoreError> {
        let info_slot = self.slot(DataCategory::SystemInfo);
        let board_slot = self.slot(DataCategory::SystemBoard);
        let mut info = info_slot.lock().await;
        let mut board = board_slot.lock().await;

        let now = Instant::now();
        let info_fresh = info.is_fresh(self.update_interval(DataCategory::SystemInfo), now);
        let board_fresh = board.is_fresh(self.update_interval(DataCategory::SystemBoard), now);

        if !info_fresh && !board_fresh {
            let client = self.pool.get(ClientKind::Default).await?;
            let calls = [
                RpcCall::call("system", "info", None),
                RpcCall::call("system", "board", None),
            ];
            debug!("refreshing system info and board in one batch");
            match client.batch_call(&calls).await {
                Ok(results) => {
                    let mut results = results.into_iter();
                    for slot in [&mut *info, &mut *board] {
                        match results.next() {
                            Some(Ok(payload)) => {
                                slot.store(payload.unwrap_or(Value::Null), now);
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "system batch element failed");
                            }
                            None => {}
                        }
                    }
                }
                Err(e) => {
                    let source = CoreError::Api(e);
                    if source.is_auth_failure() {
                        return Err(source);
                    }
                    if info.value.is_none() && board.value.is_none() {
                        return Err(CoreError::UpdateFailed {
                            category: DataCategory::SystemInfo,
                            source: Box::new(source),
                        });
                    }
                    warn!(error = %source, "system batch failed, serving stale data");
                }
            }
        } else {
            // At most one of the two is stale; plain per-category paths
            // already do the right thing without wasting a batch.
            drop(board);
            drop(info);
            for category in [DataCategory::SystemInfo, DataCategory::SystemBoard] {
                match self.get_data(category).await {
                    Ok(value) => {
                        out.insert(category.to_string(), value);
                    }
                    Err(e) if e.is_auth_failure() => return Err(e),
                    Err(e) => {
                        warn!(%category, error = %e, "category unavailable, omitting");
                    }
                }
            }
            return Ok(());
        }

        for (category, slot) in [
            (DataCategory::SystemInfo, &*info),
            (DataCategory::SystemBoard, &*board),
        ] {
            if let Some(value) = &slot.value {
                out.insert(category.to_string(), value.clone());
            } else {
                warn!(%category, "category unavailable, omitting");
            }
        }
        Ok(())
    }

    /// Drop cached freshness for one category, or for all of them.
    /// Values are kept as stale fallbacks; the next request refetches.
    pub async fn invalidate(&self, category: Option<DataCategory>) {
        match category {
            Some(category) => {
                let slot = self.slot(category);
                slot.lock().await.fetched_at = None;
            }
            None => {
                let slots: Vec<_> = self
                    .entries
                    .iter()
                    .map(|e| Arc::clone(e.value()))
                    .collect();
                for slot in slots {
                    slot.lock().await.fetched_at = None;
                }
            }
        }
    }

    /// Drop all pooled client sessions. Cached values survive so a
    /// reconnected cache can still serve stale data while it warms up.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
