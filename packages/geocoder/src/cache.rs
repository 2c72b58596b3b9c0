//! Process-lifetime geocode cache and the retrying geocoder that owns it.
//!
//! Successful lookups are memoized by exact region-name string and never
//! evicted. Failures are not cached: asking again for a region that
//! previously exhausted its retries starts a fresh round of attempts.

use std::collections::BTreeMap;
use std::time::Duration;

use ipc_dashboard_crime_models::GeocodedRegion;
use tokio::time::Instant;

use crate::GeocodeProvider;
use crate::retry::{AttemptEvent, AttemptState, RetryPolicy};

/// Successful geocoding results keyed by the exact region name queried.
#[derive(Debug, Clone, Default)]
pub struct GeocodeCache {
    entries: BTreeMap<String, GeocodedRegion>,
}

impl GeocodeCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the cached result for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GeocodedRegion> {
        self.entries.get(key)
    }

    /// Stores a successful result for `key`.
    pub fn insert(&mut self, key: String, region: GeocodedRegion) {
        self.entries.insert(key, region);
    }

    /// Number of cached regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters describing what a [`CachedGeocoder`] has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocoderStats {
    /// Lookups answered from the cache.
    pub cache_hits: u64,
    /// Requests sent to the provider (including retries).
    pub attempts: u64,
    /// Lookups that ended with a result.
    pub resolved: u64,
    /// Lookups that ran out of attempts.
    pub exhausted: u64,
}

/// Wraps a [`GeocodeProvider`] with a cache, retry/backoff and a minimum
/// interval between provider requests.
pub struct CachedGeocoder<P> {
    provider: P,
    policy: RetryPolicy,
    min_interval: Duration,
    last_request: Option<Instant>,
    cache: GeocodeCache,
    stats: GeocoderStats,
}

impl<P: GeocodeProvider> CachedGeocoder<P> {
    /// Creates a geocoder with an empty cache and no rate limit.
    #[must_use]
    pub const fn new(provider: P, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            min_interval: Duration::ZERO,
            last_request: None,
            cache: GeocodeCache::new(),
            stats: GeocoderStats {
                cache_hits: 0,
                attempts: 0,
                resolved: 0,
                exhausted: 0,
            },
        }
    }

    /// Enforces at least `interval` between consecutive provider requests.
    #[must_use]
    pub const fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// The cache of successful lookups.
    #[must_use]
    pub const fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    /// Counters accumulated since construction.
    #[must_use]
    pub const fn stats(&self) -> GeocoderStats {
        self.stats
    }

    /// The retry policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves `region` to coordinates.
    ///
    /// Returns `None` without contacting the provider for empty names.
    /// Cached results are returned as-is. Otherwise the provider is tried
    /// up to [`RetryPolicy::max_attempts`] times with exponential backoff;
    /// `None` is returned once attempts are exhausted.
    pub async fn geocode(&mut self, region: &str) -> Option<GeocodedRegion> {
        if region.trim().is_empty() {
            return None;
        }

        if let Some(hit) = self.cache.get(region) {
            self.stats.cache_hits += 1;
            log::trace!("Geocode cache hit for '{region}'");
            return Some(hit.clone());
        }

        let policy = self.policy;
        let mut state = AttemptState::Idle.transition(AttemptEvent::Start, &policy);

        loop {
            state = match state {
                AttemptState::Attempting { attempt } => {
                    self.throttle().await;
                    self.stats.attempts += 1;

                    match self.provider.lookup(region).await {
                        Ok(found) => state.transition(AttemptEvent::Succeeded(found), &policy),
                        Err(e) => {
                            log::warn!(
                                "Geocoding '{region}' via {} failed (attempt {attempt}/{}): {e}",
                                self.provider.name(),
                                policy.max_attempts(),
                            );
                            state.transition(
                                AttemptEvent::Failed {
                                    retryable: e.is_retryable(),
                                },
                                &policy,
                            )
                        }
                    }
                }
                AttemptState::RetryWait { delay, .. } => {
                    if !delay.is_zero() {
                        log::debug!("Retrying '{region}' in {delay:?}");
                        tokio::time::sleep(delay).await;
                    }
                    state.transition(AttemptEvent::WaitElapsed, &policy)
                }
                AttemptState::Resolved(found) => {
                    self.stats.resolved += 1;
                    self.cache.insert(region.to_string(), found.clone());
                    return Some(found);
                }
                AttemptState::Exhausted { attempts } => {
                    self.stats.exhausted += 1;
                    log::error!("Geocoding '{region}' failed after {attempts} attempts");
                    return None;
                }
                AttemptState::Idle => state.transition(AttemptEvent::Start, &policy),
            };
        }
    }

    async fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.min_interval;
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::GeocodeError;

    /// Fails the first `failures` calls, then returns a fixed region.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyProvider {
        const fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn lookup(&self, query: &str) -> Result<GeocodedRegion, GeocodeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(GeocodeError::Parse {
                    message: "Missing lat in response".to_string(),
                });
            }
            Ok(GeocodedRegion {
                display_name: format!("{query}, India"),
                latitude: 10.0,
                longitude: 76.0,
            })
        }
    }

    /// Always fails with a non-retryable status.
    struct ForbiddenProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl GeocodeProvider for ForbiddenProvider {
        fn name(&self) -> &str {
            "forbidden"
        }

        async fn lookup(&self, _query: &str) -> Result<GeocodedRegion, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GeocodeError::Status { status: 403 })
        }
    }

    /// Always fails with a retryable error, recording when each call lands.
    struct TimedProvider {
        started: Instant,
        calls: std::sync::Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl GeocodeProvider for TimedProvider {
        fn name(&self) -> &str {
            "timed"
        }

        async fn lookup(&self, _query: &str) -> Result<GeocodedRegion, GeocodeError> {
            self.calls.lock().unwrap().push(self.started.elapsed());
            Err(GeocodeError::Status { status: 503 })
        }
    }

    fn geocoder(failures: u32) -> CachedGeocoder<FlakyProvider> {
        CachedGeocoder::new(FlakyProvider::new(failures), RetryPolicy::immediate(3))
    }

    #[tokio::test]
    async fn repeat_lookup_is_served_from_cache() {
        let mut geocoder = geocoder(0);

        let first = geocoder.geocode("KERALA").await.unwrap();
        let second = geocoder.geocode("KERALA").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(geocoder.provider().calls(), 1);
        assert_eq!(geocoder.stats().cache_hits, 1);
        assert_eq!(geocoder.cache().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_never_reaches_provider() {
        let mut geocoder = geocoder(0);

        assert!(geocoder.geocode("").await.is_none());
        assert!(geocoder.geocode("   ").await.is_none());
        assert_eq!(geocoder.provider().calls(), 0);
        assert!(geocoder.cache().is_empty());
    }

    #[tokio::test]
    async fn recovers_after_up_to_three_failures() {
        for failures in 0..=3 {
            let mut geocoder = geocoder(failures);
            let found = geocoder.geocode("GOA").await;
            assert!(found.is_some(), "failed with {failures} failures");
            assert_eq!(geocoder.provider().calls(), failures + 1);
        }
    }

    #[tokio::test]
    async fn gives_up_after_four_attempts() {
        let mut geocoder = geocoder(u32::MAX);

        assert!(geocoder.geocode("GOA").await.is_none());
        assert_eq!(geocoder.provider().calls(), 4);
        assert_eq!(geocoder.stats().exhausted, 1);
        assert!(geocoder.cache().get("GOA").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_between_attempts() {
        let mut geocoder = CachedGeocoder::new(
            TimedProvider {
                started: Instant::now(),
                calls: std::sync::Mutex::new(Vec::new()),
            },
            RetryPolicy::default(),
        );

        assert!(geocoder.geocode("GOA").await.is_none());

        let offsets: Vec<u128> = geocoder
            .provider()
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(Duration::as_millis)
            .collect();
        assert_eq!(offsets, vec![0, 1000, 3000, 7000]);
        assert_eq!(geocoder.stats().exhausted, 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut geocoder = geocoder(4);

        assert!(geocoder.geocode("GOA").await.is_none());
        assert_eq!(geocoder.provider().calls(), 4);

        assert!(geocoder.geocode("GOA").await.is_some());
        assert_eq!(geocoder.provider().calls(), 5);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let mut geocoder = CachedGeocoder::new(
            ForbiddenProvider {
                calls: AtomicU32::new(0),
            },
            RetryPolicy::immediate(3),
        );

        assert!(geocoder.geocode("GOA").await.is_none());
        assert_eq!(geocoder.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_keys_are_exact_strings() {
        let mut geocoder = geocoder(0);

        geocoder.geocode("Kerala").await.unwrap();
        geocoder.geocode("KERALA").await.unwrap();

        assert_eq!(geocoder.provider().calls(), 2);
        assert_eq!(geocoder.cache().len(), 2);
    }
}
