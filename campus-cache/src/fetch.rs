//! The fetch orchestrator.
//!
//! [`CachedClient`] routes every read through the entry store and an
//! in-flight request map. For each logical request it lands in exactly one
//! of five states: forced refresh, in-flight join, miss, fresh hit, or stale
//! hit. The decision is made under the in-flight lock so that the per-key
//! at-most-one-network-request guarantee holds no matter how many callers
//! arrive at once; the lock is released before anything is awaited.
//!
//! The in-flight slot is an explicit shared future: all concurrent callers
//! for one key clone the same [`Shared`] handle and observe the same
//! eventual result. A spawned driver task polls every fetch to completion,
//! which gives two properties the UI relies on: a caller that unmounts and
//! drops its handle does not cancel the fetch (the result still lands in the
//! cache for the next mount), and a stale-while-revalidate refresh makes
//! progress with no caller awaiting it at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use campus_core::{ApiError, ApiResult, HttpMethod, QueryParams, RequestContext};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::entry::{CacheStats, EntryStore};
use crate::invalidate::InvalidationEngine;
use crate::key::CacheKey;
use crate::transport::HttpTransport;

/// The shared handle all coalesced callers of one fetch await.
type SharedFetch = Shared<BoxFuture<'static, ApiResult<Value>>>;

/// Per-call options for a cached read.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Ignore any cached value and fetch from the network. Concurrent
    /// callers for the same key still join the single in-flight request.
    pub force_refresh: bool,
    /// Freshness window in minutes; falls back to
    /// [`CacheConfig::default_ttl_minutes`] when unset.
    pub ttl_minutes: Option<u32>,
    /// When the cached value is stale, return it immediately and refresh in
    /// the background instead of making the caller wait.
    pub stale_while_revalidate: bool,
    /// Context dimensions scoping this read.
    pub context: RequestContext,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn with_ttl_minutes(mut self, minutes: u32) -> Self {
        self.ttl_minutes = Some(minutes);
        self
    }

    pub fn stale_while_revalidate(mut self) -> Self {
        self.stale_while_revalidate = true;
        self
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// What the orchestrator decided to do for one call, resolved under the
/// in-flight lock and acted on after it is released.
enum Action {
    /// Await a (new or joined) in-flight fetch.
    Await(SharedFetch),
    /// Serve this value and do nothing else.
    Serve(Value),
    /// Serve this stale value; a background refresh is already registered.
    ServeStale(Value),
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    store: Arc<EntryStore>,
    invalidation: InvalidationEngine,
    in_flight: Mutex<HashMap<CacheKey, SharedFetch>>,
    config: CacheConfig,
}

/// The cached API client: cache-aware reads, invalidating writes.
///
/// Cloning is cheap and every clone shares the same store and in-flight
/// map; construct one per process at application start and hand clones to
/// each façade.
#[derive(Clone)]
pub struct CachedClient {
    inner: Arc<Inner>,
}

impl CachedClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: CacheConfig) -> Self {
        let store = Arc::new(EntryStore::new());
        Self {
            inner: Arc::new(Inner {
                transport,
                invalidation: InvalidationEngine::new(Arc::clone(&store)),
                store,
                in_flight: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    /// The underlying entry store.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.inner.store
    }

    /// The invalidation engine bound to this client's store.
    pub fn invalidation(&self) -> &InvalidationEngine {
        &self.inner.invalidation
    }

    /// Current cache counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.store.stats()
    }

    /// Drop every cached entry. In-flight fetches are unaffected and will
    /// repopulate the store when they land.
    pub fn clear(&self) {
        self.inner.store.clear();
    }

    /// Cache-aware read.
    ///
    /// Errors from the synchronous fetch path (miss, forced, stale without
    /// stale-while-revalidate) propagate to every coalesced caller and
    /// never write a cache entry. A failed background refresh is logged and
    /// swallowed; the stale entry stays in place.
    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<QueryParams>,
        options: FetchOptions,
    ) -> ApiResult<Value> {
        if endpoint.is_empty() {
            return Err(ApiError::invalid_request("endpoint must not be empty"));
        }
        let key = CacheKey::compose(endpoint, params.as_ref(), &options.context);
        let ttl = options
            .ttl_minutes
            .unwrap_or(self.inner.config.default_ttl_minutes);

        let action = {
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .expect("in-flight lock poisoned");

            if options.force_refresh {
                let fetch = match in_flight.get(&key) {
                    Some(existing) => existing.clone(),
                    None => self.begin_fetch(&mut in_flight, &key, endpoint, params.clone(), ttl),
                };
                Action::Await(fetch)
            } else if let Some(existing) = in_flight.get(&key) {
                // Join without re-checking freshness: the in-flight result
                // is by definition the newest data we can offer.
                Action::Await(existing.clone())
            } else {
                match self.inner.store.get(&key) {
                    None => Action::Await(self.begin_fetch(
                        &mut in_flight,
                        &key,
                        endpoint,
                        params.clone(),
                        ttl,
                    )),
                    Some(entry) if entry.is_fresh() => {
                        debug!(%key, "cache hit (fresh)");
                        Action::Serve(entry.value)
                    }
                    Some(entry) if options.stale_while_revalidate => {
                        debug!(%key, age_secs = entry.age().num_seconds(), "cache hit (stale), refreshing in background");
                        self.begin_fetch(&mut in_flight, &key, endpoint, params.clone(), ttl);
                        Action::ServeStale(entry.value)
                    }
                    Some(_) => {
                        debug!(%key, "cache hit (stale), refetching synchronously");
                        Action::Await(self.begin_fetch(
                            &mut in_flight,
                            &key,
                            endpoint,
                            params.clone(),
                            ttl,
                        ))
                    }
                }
            }
        };

        match action {
            Action::Serve(value) | Action::ServeStale(value) => Ok(value),
            Action::Await(fetch) => fetch.await,
        }
    }

    /// Cache-aware read, deserialized into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<QueryParams>,
        options: FetchOptions,
    ) -> ApiResult<T> {
        let value = self.get(endpoint, params, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Whether a (possibly stale) entry exists for this request. Never
    /// touches the network.
    pub fn has_cache(
        &self,
        endpoint: &str,
        params: Option<&QueryParams>,
        context: &RequestContext,
    ) -> bool {
        let key = CacheKey::compose(endpoint, params, context);
        self.inner.store.peek(&key).is_some()
    }

    /// The cached value for this request if one exists, stale or not.
    /// Never touches the network; `None` on miss.
    pub fn get_cached_only(
        &self,
        endpoint: &str,
        params: Option<&QueryParams>,
        context: &RequestContext,
    ) -> Option<Value> {
        let key = CacheKey::compose(endpoint, params, context);
        self.inner.store.peek(&key).map(|entry| entry.value)
    }

    /// POST to `endpoint`, then invalidate its resource family under
    /// `context`.
    pub async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        context: &RequestContext,
    ) -> ApiResult<Value> {
        self.mutate(HttpMethod::Post, endpoint, Some(body), context)
            .await
    }

    /// PUT to `endpoint`, then invalidate its resource family.
    pub async fn put(
        &self,
        endpoint: &str,
        body: &Value,
        context: &RequestContext,
    ) -> ApiResult<Value> {
        self.mutate(HttpMethod::Put, endpoint, Some(body), context)
            .await
    }

    /// PATCH `endpoint`, then invalidate its resource family.
    pub async fn patch(
        &self,
        endpoint: &str,
        body: &Value,
        context: &RequestContext,
    ) -> ApiResult<Value> {
        self.mutate(HttpMethod::Patch, endpoint, Some(body), context)
            .await
    }

    /// DELETE `endpoint`, then invalidate its resource family.
    pub async fn delete(&self, endpoint: &str, context: &RequestContext) -> ApiResult<()> {
        self.mutate(HttpMethod::Delete, endpoint, None, context)
            .await
            .map(|_| ())
    }

    /// A mutation goes straight to the transport; on success the affected
    /// family is purged. Invalidation is infallible, so the mutation result
    /// is authoritative either way.
    async fn mutate(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        context: &RequestContext,
    ) -> ApiResult<Value> {
        debug_assert!(method.is_mutating());
        if endpoint.is_empty() {
            return Err(ApiError::invalid_request("endpoint must not be empty"));
        }
        let result = self
            .inner
            .transport
            .request(method, endpoint, None, body)
            .await?;
        self.inner.invalidation.invalidate(endpoint, context);
        Ok(result)
    }

    /// Register a new in-flight fetch for `key` and return its shared
    /// handle. Must be called with the in-flight lock held; the returned
    /// future only runs once polled, i.e. after the caller releases the
    /// lock.
    fn begin_fetch(
        &self,
        in_flight: &mut HashMap<CacheKey, SharedFetch>,
        key: &CacheKey,
        endpoint: &str,
        params: Option<QueryParams>,
        ttl_minutes: u32,
    ) -> SharedFetch {
        let inner = Arc::clone(&self.inner);
        let fut_key = key.clone();
        let fut_endpoint = endpoint.to_string();

        let fetch: SharedFetch = async move {
            let result = inner
                .transport
                .request(HttpMethod::Get, &fut_endpoint, params.as_ref(), None)
                .await;

            if let Ok(value) = &result {
                inner
                    .store
                    .insert(fut_key.clone(), value.clone(), ttl_minutes);
                if inner.config.max_entries > 0 {
                    let in_flight = inner.in_flight.lock().expect("in-flight lock poisoned");
                    inner
                        .store
                        .evict_to_cap(inner.config.max_entries, |k| in_flight.contains_key(k));
                }
            }

            // Clear the slot on success and failure alike so the next
            // caller re-evaluates freshness instead of joining a finished
            // fetch.
            inner
                .in_flight
                .lock()
                .expect("in-flight lock poisoned")
                .remove(&fut_key);

            result
        }
        .boxed()
        .shared();

        in_flight.insert(key.clone(), fetch.clone());

        // Drive the fetch to completion independently of the callers. This
        // is what keeps a fetch alive past UI unmount and what powers the
        // background half of stale-while-revalidate. Errors here are only
        // logged: callers on the synchronous path hold their own handle and
        // see the same error through it.
        let driver = fetch.clone();
        let driver_key = key.clone();
        tokio::spawn(async move {
            if let Err(err) = driver.await {
                warn!(key = %driver_key, %err, "fetch failed; any stale entry is kept");
            }
        });

        fetch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use futures_util::future::join_all;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scriptable transport double: counts calls, optionally sleeps to keep
    /// requests in flight, pops scripted responses before the fallback.
    struct MockTransport {
        calls: AtomicUsize,
        script: Mutex<VecDeque<ApiResult<Value>>>,
        fallback: ApiResult<Value>,
        delay: Duration,
    }

    impl MockTransport {
        fn returning(value: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(VecDeque::new()),
                fallback: Ok(value),
                delay: Duration::ZERO,
            })
        }

        fn failing(err: ApiError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(VecDeque::new()),
                fallback: Err(err),
                delay: Duration::ZERO,
            })
        }

        fn scripted(responses: Vec<ApiResult<Value>>, fallback: ApiResult<Value>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(responses.into()),
                fallback,
                delay: Duration::ZERO,
            })
        }

        fn with_delay(mut self: Arc<Self>, delay: Duration) -> Arc<Self> {
            Arc::get_mut(&mut self).expect("unshared").delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn request(
            &self,
            _method: HttpMethod,
            _endpoint: &str,
            _params: Option<&QueryParams>,
            _body: Option<&Value>,
        ) -> ApiResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let scripted = self.script.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| self.fallback.clone())
        }
    }

    fn client(transport: Arc<MockTransport>) -> CachedClient {
        CachedClient::new(transport, CacheConfig::default())
    }

    fn ctx(institute: &str) -> RequestContext {
        RequestContext::for_institute(institute)
    }

    fn page(n: i64) -> QueryParams {
        QueryParams::new().with("page", n)
    }

    /// Backdate an entry so it sits on the stale side of its TTL.
    fn seed_stale(client: &CachedClient, endpoint: &str, params: Option<&QueryParams>, context: &RequestContext, value: Value) {
        let key = CacheKey::compose(endpoint, params, context);
        client
            .store()
            .insert_at(key, value, 1, Utc::now() - ChronoDuration::seconds(61));
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("condition was not reached in time");
    }

    #[tokio::test]
    async fn test_miss_fetches_then_fresh_hit_serves_cached() {
        let transport = MockTransport::returning(json!({"students": [1, 2]}));
        let client = client(Arc::clone(&transport));
        let options = || FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(15);

        let first = client.get("/students", Some(page(1)), options()).await.unwrap();
        let second = client.get("/students", Some(page(1)), options()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_gets_coalesce_to_one_call() {
        let transport =
            MockTransport::returning(json!({"ok": true})).with_delay(Duration::from_millis(20));
        let client = client(Arc::clone(&transport));

        let futures: Vec<_> = (0..5)
            .map(|_| {
                let client = client.clone();
                async move {
                    client
                        .get("/students", Some(page(1)), FetchOptions::new().with_context(ctx("I1")))
                        .await
                }
            })
            .collect();
        let results = join_all(futures).await;

        assert_eq!(transport.calls(), 1);
        for result in results {
            assert_eq!(result.unwrap(), json!({"ok": true}));
        }
    }

    #[tokio::test]
    async fn test_different_contexts_do_not_coalesce() {
        let transport = MockTransport::returning(json!([]));
        let client = client(Arc::clone(&transport));

        client
            .get("/students", None, FetchOptions::new().with_context(ctx("A")))
            .await
            .unwrap();
        client
            .get("/students", None, FetchOptions::new().with_context(ctx("B")))
            .await
            .unwrap();

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_without_swr_refetches_synchronously() {
        let transport = MockTransport::returning(json!("new"));
        let client = client(Arc::clone(&transport));
        seed_stale(&client, "/students", None, &ctx("I1"), json!("old"));

        let value = client
            .get("/students", None, FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(1))
            .await
            .unwrap();

        assert_eq!(value, json!("new"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_not_refetched_before_ttl() {
        let transport = MockTransport::returning(json!("new"));
        let client = client(Arc::clone(&transport));
        // 59 seconds old with a one-minute TTL: still fresh.
        let key = CacheKey::compose("/students", None, &ctx("I1"));
        client
            .store()
            .insert_at(key, json!("old"), 1, Utc::now() - ChronoDuration::seconds(59));

        let value = client
            .get("/students", None, FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(1))
            .await
            .unwrap();

        assert_eq!(value, json!("old"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_swr_serves_stale_and_refreshes_once_in_background() {
        let transport = MockTransport::returning(json!("new"));
        let client = client(Arc::clone(&transport));
        seed_stale(&client, "/students", None, &ctx("I1"), json!("old"));

        let options = FetchOptions::new()
            .with_context(ctx("I1"))
            .with_ttl_minutes(1)
            .stale_while_revalidate();
        let served = client.get("/students", None, options).await.unwrap();
        assert_eq!(served, json!("old"));

        wait_until(|| {
            client.get_cached_only("/students", None, &ctx("I1")) == Some(json!("new"))
        })
        .await;
        assert_eq!(transport.calls(), 1);

        // The refreshed value is now a fresh hit.
        let next = client
            .get("/students", None, FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(1))
            .await
            .unwrap();
        assert_eq!(next, json!("new"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_swr_refresh_failure_keeps_stale_entry() {
        let transport = MockTransport::failing(ApiError::http(500, "boom"));
        let client = client(Arc::clone(&transport));
        seed_stale(&client, "/students", None, &ctx("I1"), json!("old"));

        let options = FetchOptions::new()
            .with_context(ctx("I1"))
            .with_ttl_minutes(1)
            .stale_while_revalidate();
        let served = client.get("/students", None, options.clone()).await.unwrap();
        assert_eq!(served, json!("old"));

        wait_until(|| transport.calls() >= 1).await;
        // Caller never saw the failure, and the stale value survived it.
        assert_eq!(
            client.get_cached_only("/students", None, &ctx("I1")),
            Some(json!("old"))
        );

        let served_again = client.get("/students", None, options).await.unwrap();
        assert_eq!(served_again, json!("old"));
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_entry() {
        let transport = MockTransport::returning(json!("refetched"));
        let client = client(Arc::clone(&transport));
        client
            .store()
            .insert(CacheKey::compose("/students", None, &ctx("I1")), json!("cached"), 60);

        let value = client
            .get(
                "/students",
                None,
                FetchOptions::new().with_context(ctx("I1")).force_refresh(),
            )
            .await
            .unwrap();

        assert_eq!(value, json!("refetched"));
        assert_eq!(transport.calls(), 1);
        assert_eq!(
            client.get_cached_only("/students", None, &ctx("I1")),
            Some(json!("refetched"))
        );
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_to_all_callers_without_poisoning() {
        let transport = MockTransport::failing(ApiError::http(502, "bad gateway"))
            .with_delay(Duration::from_millis(10));
        let client = client(Arc::clone(&transport));

        let a = client.get("/students", None, FetchOptions::new().with_context(ctx("I1")));
        let b = client.get("/students", None, FetchOptions::new().with_context(ctx("I1")));
        let (a, b) = tokio::join!(a, b);

        let expected = ApiError::http(502, "bad gateway");
        assert_eq!(a.unwrap_err(), expected);
        assert_eq!(b.unwrap_err(), expected);
        assert_eq!(transport.calls(), 1);
        assert!(client.store().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_slot_cleared_after_failure() {
        let transport = MockTransport::scripted(
            vec![Err(ApiError::network("down")), Ok(json!("up"))],
            Ok(json!("up")),
        );
        let client = client(Arc::clone(&transport));
        let options = || FetchOptions::new().with_context(ctx("I1"));

        assert!(client.get("/students", None, options()).await.is_err());
        let value = client.get("/students", None, options()).await.unwrap();

        assert_eq!(value, json!("up"));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_probes_never_fetch() {
        let transport = MockTransport::returning(json!("unused"));
        let client = client(Arc::clone(&transport));

        assert!(!client.has_cache("/students", None, &ctx("I1")));
        assert_eq!(client.get_cached_only("/students", None, &ctx("I1")), None);

        seed_stale(&client, "/students", None, &ctx("I1"), json!("stale"));
        // Stale entries still count as present.
        assert!(client.has_cache("/students", None, &ctx("I1")));
        assert_eq!(
            client.get_cached_only("/students", None, &ctx("I1")),
            Some(json!("stale"))
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_family_scoped_to_context() {
        let transport = MockTransport::returning(json!({"data": []}));
        let client = client(Arc::clone(&transport));
        let options = |i: &str| FetchOptions::new().with_context(ctx(i)).with_ttl_minutes(15);

        // Warm both institutes' caches.
        client.get("/students", Some(page(1)), options("I1")).await.unwrap();
        client.get("/students", Some(page(2)), options("I1")).await.unwrap();
        client.get("/students", Some(page(1)), options("I2")).await.unwrap();
        assert_eq!(transport.calls(), 3);

        // No mutation: both pages of I1 are still cached.
        client.get("/students", Some(page(1)), options("I1")).await.unwrap();
        assert_eq!(transport.calls(), 3);

        client
            .post("/students", &json!({"name": "New Student"}), &ctx("I1"))
            .await
            .unwrap();
        assert_eq!(transport.calls(), 4);

        // I1's pages were purged and refetch; I2's page is untouched.
        client.get("/students", Some(page(1)), options("I1")).await.unwrap();
        assert_eq!(transport.calls(), 5);
        client.get("/students", Some(page(1)), options("I2")).await.unwrap();
        assert_eq!(transport.calls(), 5);
    }

    #[tokio::test]
    async fn test_delete_on_item_invalidates_collection_views() {
        let transport = MockTransport::returning(json!({"data": []}));
        let client = client(Arc::clone(&transport));
        let options = FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(15);

        client.get("/students", Some(page(1)), options.clone()).await.unwrap();
        client.delete("/students/42", &ctx("I1")).await.unwrap();

        client.get("/students", Some(page(1)), options).await.unwrap();
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_invalidate() {
        let transport = MockTransport::scripted(
            vec![Ok(json!("cached")), Err(ApiError::http(403, "forbidden"))],
            Ok(json!("cached")),
        );
        let client = client(Arc::clone(&transport));
        let options = FetchOptions::new().with_context(ctx("I1")).with_ttl_minutes(15);

        client.get("/students", None, options.clone()).await.unwrap();
        assert!(client
            .post("/students", &json!({}), &ctx("I1"))
            .await
            .is_err());

        // Cache untouched: the read is still a hit.
        client.get("/students", None, options).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_entry_cap_evicts_lru() {
        let transport = MockTransport::returning(json!([]));
        let client = CachedClient::new(
            Arc::clone(&transport) as Arc<dyn HttpTransport>,
            CacheConfig::new().with_max_entries(2),
        );

        for endpoint in ["/a", "/b", "/c"] {
            client
                .get(endpoint, None, FetchOptions::new())
                .await
                .unwrap();
        }

        assert_eq!(client.store().len(), 2);
        assert_eq!(client.stats().evictions, 1);
    }

    #[tokio::test]
    async fn test_get_as_deserializes() {
        #[derive(serde::Deserialize)]
        struct Payload {
            count: u32,
        }

        let transport = MockTransport::returning(json!({"count": 7}));
        let client = client(transport);
        let payload: Payload = client
            .get_as("/students/summary", None, FetchOptions::new())
            .await
            .unwrap();
        assert_eq!(payload.count, 7);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let transport = MockTransport::returning(json!([]));
        let client = client(Arc::clone(&transport));
        let options = || FetchOptions::new().with_ttl_minutes(15);

        client.get("/students", None, options()).await.unwrap();
        client.clear();
        client.get("/students", None, options()).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_endpoint_rejected() {
        let transport = MockTransport::returning(json!([]));
        let client = client(transport);
        let err = client.get("", None, FetchOptions::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest { .. }));
    }
}
