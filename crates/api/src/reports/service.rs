//! The cache-aside report engine.
//!
//! One request follows `MISS -> COMPUTE -> STORE(async) -> RETURN` or
//! `HIT -> RETURN`. The store write is a detached task: the caller gets
//! the computed report before the cache write resolves, and write
//! failures are only logged and counted. Cache reads and deletes are
//! bounded by a timeout and degrade to misses / zero counts; only punch
//! store errors propagate, since a failed read has no safe default.
//!
//! Concurrent misses for the same key may both compute and both write.
//! Every write is a full-value overwrite, so last write wins and no
//! de-duplication is attempted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use punchcard_cache::{CacheStats, CacheStatsSnapshot, ReportCache};
use punchcard_core::cache_key;
use punchcard_core::report::{aggregate, issue_rows, AggregateOptions, Report};
use punchcard_core::ttl::TtlTier;
use punchcard_db::store::{PunchStore, StoreError};

use crate::reports::params::ReportRequest;

// ---------------------------------------------------------------------------
// Invalidation scope
// ---------------------------------------------------------------------------

/// Which slice of the report namespace a bulk invalidation clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationScope {
    Individual,
    Group,
    All,
}

impl InvalidationScope {
    fn pattern(&self) -> String {
        match self {
            Self::Individual => cache_key::all_individual_pattern(),
            Self::Group => cache_key::all_group_pattern(),
            Self::All => cache_key::all_pattern(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReportService
// ---------------------------------------------------------------------------

/// Cache-aside orchestrator over the punch store and the report cache.
///
/// Holds no per-request state; the cache store and the statistics
/// counters are the only shared mutable resources.
pub struct ReportService<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    stats: Arc<CacheStats>,
    cache_op_timeout: Duration,
    aggregate_options: AggregateOptions,
}

impl<S, C> ReportService<S, C>
where
    S: PunchStore + 'static,
    C: ReportCache + 'static,
{
    pub fn new(
        store: Arc<S>,
        cache: Arc<C>,
        cache_op_timeout: Duration,
        punch_row_cap: usize,
    ) -> Self {
        Self {
            store,
            cache,
            stats: Arc::new(CacheStats::default()),
            cache_op_timeout,
            aggregate_options: AggregateOptions { punch_row_cap },
        }
    }

    /// Generate a report, consulting the cache first.
    pub async fn generate_report(&self, request: &ReportRequest) -> Result<Report, StoreError> {
        let key = request.report_key().render();

        if let Some(value) = self.cache_get(&key).await {
            match serde_json::from_value::<Report>(value) {
                Ok(report) => return Ok(report),
                Err(err) => {
                    // A payload we can no longer decode is as good as absent.
                    tracing::warn!(key = %key, error = %err, "Discarding undecodable cached report");
                }
            }
        }

        let punches = self
            .store
            .query_punches(&request.range, &request.filter, request.employee_id.as_deref())
            .await?;

        let rows = issue_rows(&punches);
        let report = aggregate(
            &rows,
            request.grouping,
            &request.range,
            &request.filter,
            &self.aggregate_options,
        );

        let member_count: usize = report.groups.iter().map(|g| g.count).sum();
        let tier = TtlTier::for_report(&request.key_scope(), member_count);

        match serde_json::to_value(&report) {
            Ok(value) => self.spawn_cache_set(key, value, tier.duration()),
            Err(err) => {
                self.stats.record_set_failure();
                tracing::warn!(key = %key, error = %err, "Report payload not serializable, skipping cache");
            }
        }

        Ok(report)
    }

    /// Cache-aside wrapper for low-cardinality lookups (org hierarchy).
    pub async fn cached_lookup<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        load: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.cache_get(key).await {
            if let Ok(cached) = serde_json::from_value::<T>(value) {
                return Ok(cached);
            }
            tracing::warn!(key = %key, "Discarding undecodable cached lookup");
        }

        let fresh = load().await?;

        match serde_json::to_value(&fresh) {
            Ok(value) => self.spawn_cache_set(key.to_string(), value, ttl),
            Err(err) => {
                self.stats.record_set_failure();
                tracing::warn!(key = %key, error = %err, "Lookup payload not serializable, skipping cache");
            }
        }

        Ok(fresh)
    }

    // -- Invalidation -------------------------------------------------------

    /// Invalidate after an employee-level mutation.
    ///
    /// Clears the employee's individual reports and every group report:
    /// group aggregates may include the employee and cannot be
    /// surgically excluded, so the group side is coarse-grained.
    pub async fn invalidate_employee(&self, employee_id: &str) -> u64 {
        let individual = self
            .delete_pattern(&cache_key::individual_pattern_for_employee(employee_id))
            .await;
        let group = self.delete_pattern(&cache_key::all_group_pattern()).await;

        tracing::info!(
            employee_id = %employee_id,
            removed = individual + group,
            "Employee report cache invalidated"
        );
        individual + group
    }

    /// Invalidate the group reports scoped to an organizational slice.
    ///
    /// Removes exactly the group keys whose segments include the given
    /// scope; individual keys and other org slices are untouched.
    pub async fn invalidate_organization(
        &self,
        division: Option<&str>,
        section: Option<&str>,
        sub_section: Option<&str>,
    ) -> u64 {
        let division = cache_key::normalize_org_value(division);
        let section = cache_key::normalize_org_value(section);
        let sub_section = cache_key::normalize_org_value(sub_section);

        let pattern = if division.is_none() && section.is_none() && sub_section.is_none() {
            cache_key::all_group_pattern()
        } else {
            cache_key::group_pattern_for_org(
                division.as_deref(),
                section.as_deref(),
                sub_section.as_deref(),
            )
        };

        let removed = self.delete_pattern(&pattern).await;
        tracing::info!(pattern = %pattern, removed, "Organization report cache invalidated");
        removed
    }

    /// Invalidate a whole scope of the report namespace.
    pub async fn invalidate_all(&self, scope: InvalidationScope) -> u64 {
        let pattern = scope.pattern();
        let removed = self.delete_pattern(&pattern).await;
        tracing::info!(pattern = %pattern, removed, "Report cache scope invalidated");
        removed
    }

    // -- Statistics ---------------------------------------------------------

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    // -- Cache plumbing -----------------------------------------------------

    /// Bounded-timeout cache read. Errors and timeouts count as misses;
    /// cache unavailability must never surface to the caller.
    async fn cache_get(&self, key: &str) -> Option<Value> {
        let started = Instant::now();
        match tokio::time::timeout(self.cache_op_timeout, self.cache.get(key)).await {
            Ok(Ok(Some(value))) => {
                self.stats.record_hit(started.elapsed());
                tracing::debug!(key = %key, "Report cache hit");
                Some(value)
            }
            Ok(Ok(None)) => {
                self.stats.record_miss(started.elapsed());
                None
            }
            Ok(Err(err)) => {
                self.stats.record_miss(started.elapsed());
                tracing::warn!(key = %key, error = %err, "Cache read failed, treating as miss");
                None
            }
            Err(_) => {
                self.stats.record_miss(started.elapsed());
                tracing::warn!(key = %key, "Cache read timed out, treating as miss");
                None
            }
        }
    }

    /// Fire-and-forget cache write: the response path never waits on it.
    fn spawn_cache_set(&self, key: String, value: Value, ttl: Duration) {
        let cache = Arc::clone(&self.cache);
        let stats = Arc::clone(&self.stats);
        let op_timeout = self.cache_op_timeout;

        tokio::spawn(async move {
            let started = Instant::now();
            match tokio::time::timeout(op_timeout, cache.set(&key, value, ttl)).await {
                Ok(Ok(())) => {
                    stats.record_set(started.elapsed());
                    tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Report cached");
                }
                Ok(Err(err)) => {
                    stats.record_set_failure();
                    tracing::warn!(key = %key, error = %err, "Cache write failed");
                }
                Err(_) => {
                    stats.record_set_failure();
                    tracing::warn!(key = %key, "Cache write timed out");
                }
            }
        });
    }

    /// Bounded-timeout pattern deletion; failures degrade to zero.
    async fn delete_pattern(&self, pattern: &str) -> u64 {
        match tokio::time::timeout(self.cache_op_timeout, self.cache.delete_pattern(pattern)).await
        {
            Ok(Ok(removed)) => {
                self.stats.record_deleted(removed);
                removed
            }
            Ok(Err(err)) => {
                tracing::warn!(pattern = %pattern, error = %err, "Cache invalidation failed");
                0
            }
            Err(_) => {
                tracing::warn!(pattern = %pattern, "Cache invalidation timed out");
                0
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use chrono::{NaiveDate, NaiveTime};

    use punchcard_cache::client::CacheError;
    use punchcard_cache::{MemoryCache, ReportCache};
    use punchcard_core::punch::{DateRange, OrgFilter, Punch};

    use crate::reports::params::ReportQuery;

    // -- Test doubles ---------------------------------------------------------

    /// In-memory punch store applying the same predicates as the real one.
    struct MemStore {
        punches: Vec<Punch>,
        query_count: AtomicUsize,
    }

    impl MemStore {
        fn new(punches: Vec<Punch>) -> Self {
            Self {
                punches,
                query_count: AtomicUsize::new(0),
            }
        }

        fn query_count(&self) -> usize {
            self.query_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl PunchStore for MemStore {
        async fn query_punches(
            &self,
            range: &DateRange,
            filter: &OrgFilter,
            employee_id: Option<&str>,
        ) -> Result<Vec<Punch>, StoreError> {
            self.query_count.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .punches
                .iter()
                .filter(|p| range.contains(p.date) && filter.matches(p))
                .filter(|p| employee_id.map_or(true, |id| p.employee_id == id))
                .cloned()
                .collect())
        }
    }

    /// A punch store whose queries always fail.
    struct FailingStore;

    #[async_trait::async_trait]
    impl PunchStore for FailingStore {
        async fn query_punches(
            &self,
            _range: &DateRange,
            _filter: &OrgFilter,
            _employee_id: Option<&str>,
        ) -> Result<Vec<Punch>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }
    }

    /// A cache backend that errors on every operation.
    struct FailingCache;

    #[async_trait::async_trait]
    impl ReportCache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: Value, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }

        async fn delete_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }
    }

    // -- Helpers --------------------------------------------------------------

    fn punch(employee_id: &str, name: &str, division: &str, day: u32, hour: u32, scan: &str) -> Punch {
        Punch {
            employee_id: employee_id.to_string(),
            employee_name: name.to_string(),
            designation: None,
            division: division.to_string(),
            section: "S1".to_string(),
            sub_section: None,
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            scan_type: scan.to_string(),
            device_id: None,
        }
    }

    fn request(from: &str, to: &str, grouping: &str) -> ReportRequest {
        serde_json::from_value::<ReportQuery>(serde_json::json!({
            "from_date": from,
            "to_date": to,
            "grouping": grouping,
        }))
        .unwrap()
        .into_request()
        .unwrap()
    }

    fn request_for_division(from: &str, to: &str, division: &str) -> ReportRequest {
        serde_json::from_value::<ReportQuery>(serde_json::json!({
            "from_date": from,
            "to_date": to,
            "division_id": division,
        }))
        .unwrap()
        .into_request()
        .unwrap()
    }

    fn request_for_employee(from: &str, to: &str, employee_id: &str) -> ReportRequest {
        serde_json::from_value::<ReportQuery>(serde_json::json!({
            "from_date": from,
            "to_date": to,
            "employee_id": employee_id,
        }))
        .unwrap()
        .into_request()
        .unwrap()
    }

    fn service_with(
        store: MemStore,
        cache: Arc<MemoryCache>,
    ) -> ReportService<MemStore, MemoryCache> {
        ReportService::new(Arc::new(store), cache, Duration::from_millis(250), 50_000)
    }

    /// Wait for the detached write of `key` to land in the cache.
    async fn wait_for_key(cache: &MemoryCache, key: &str) {
        for _ in 0..100 {
            if cache.get(key).await.unwrap().is_some() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("cache write for '{key}' never landed");
    }

    // -- generate_report ------------------------------------------------------

    #[tokio::test]
    async fn single_in_punch_end_to_end() {
        let store = MemStore::new(vec![punch("E1", "Asha", "D1", 26, 8, "IN")]);
        let service = service_with(store, Arc::new(MemoryCache::default()));

        let report = service
            .generate_report(&request("2026-01-26", "2026-01-26", "none"))
            .await
            .unwrap();

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, "All Employees");
        assert_eq!(report.groups[0].members.len(), 1);
        assert_eq!(report.groups[0].members[0].employee_id, "E1");
        assert_eq!(report.groups[0].members[0].issue_count, Some(1));
        assert_eq!(report.summary.total_employees, 1);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache = Arc::new(MemoryCache::default());
        let store = MemStore::new(vec![punch("E1", "Asha", "D1", 26, 8, "IN")]);
        let req = request("2026-01-26", "2026-01-26", "none");
        let key = req.report_key().render();

        let service = service_with(store, Arc::clone(&cache));

        let first = service.generate_report(&req).await.unwrap();
        assert_eq!(service.store.query_count(), 1);

        wait_for_key(&cache, &key).await;

        let second = service.generate_report(&req).await.unwrap();
        assert_eq!(service.store.query_count(), 1);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );

        // Give the detached writer a beat to record its counters.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let stats = service.stats();
        assert_eq!(stats.hits, 1);
        assert!(stats.misses >= 1);
        assert_eq!(stats.sets, 1);
    }

    #[tokio::test]
    async fn failing_cache_degrades_to_direct_computation() {
        let punches = vec![
            punch("E1", "Asha", "D1", 26, 8, "IN"),
            punch("E2", "Binod", "D1", 26, 17, "OUT"),
        ];
        let req = request("2026-01-26", "2026-01-26", "designation");

        let cached_service = service_with(
            MemStore::new(punches.clone()),
            Arc::new(MemoryCache::default()),
        );
        let uncached_service = ReportService::new(
            Arc::new(MemStore::new(punches)),
            Arc::new(FailingCache),
            Duration::from_millis(250),
            50_000,
        );

        let with_cache = cached_service.generate_report(&req).await.unwrap();
        let without_cache = uncached_service.generate_report(&req).await.unwrap();

        assert_eq!(
            serde_json::to_value(&with_cache).unwrap(),
            serde_json::to_value(&without_cache).unwrap()
        );

        // Every call recomputes when the cache is down; nothing errors.
        uncached_service.generate_report(&req).await.unwrap();
        assert_eq!(uncached_service.store.query_count(), 2);
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let service = ReportService::new(
            Arc::new(FailingStore),
            Arc::new(MemoryCache::default()),
            Duration::from_millis(250),
            50_000,
        );

        let result = service
            .generate_report(&request("2026-01-26", "2026-01-26", "none"))
            .await;
        assert_matches!(result, Err(StoreError::Database(_)));
    }

    #[tokio::test]
    async fn employee_request_only_sees_that_employee() {
        let store = MemStore::new(vec![
            punch("E1", "Asha", "D1", 26, 8, "IN"),
            punch("E2", "Binod", "D1", 26, 9, "IN"),
        ]);
        let service = service_with(store, Arc::new(MemoryCache::default()));

        let report = service
            .generate_report(&request_for_employee("2026-01-26", "2026-01-26", "E1"))
            .await
            .unwrap();

        assert_eq!(report.summary.total_employees, 1);
        assert_eq!(report.groups[0].members[0].employee_id, "E1");
    }

    // -- Invalidation ---------------------------------------------------------

    /// Seed the cache with one D1 group report, one D2 group report and
    /// one E1 individual report; return (service, cache, keys).
    async fn seeded_service() -> (
        ReportService<MemStore, MemoryCache>,
        Arc<MemoryCache>,
        [String; 3],
    ) {
        let cache = Arc::new(MemoryCache::default());
        let store = MemStore::new(vec![
            punch("E1", "Asha", "D1", 26, 8, "IN"),
            punch("E2", "Binod", "D2", 26, 9, "IN"),
        ]);
        let service = service_with(store, Arc::clone(&cache));

        let d1 = request_for_division("2026-01-26", "2026-01-26", "D1");
        let d2 = request_for_division("2026-01-26", "2026-01-26", "D2");
        let e1 = request_for_employee("2026-01-26", "2026-01-26", "E1");

        let keys = [
            d1.report_key().render(),
            d2.report_key().render(),
            e1.report_key().render(),
        ];

        service.generate_report(&d1).await.unwrap();
        service.generate_report(&d2).await.unwrap();
        service.generate_report(&e1).await.unwrap();
        for key in &keys {
            wait_for_key(&cache, key).await;
        }

        (service, cache, keys)
    }

    #[tokio::test]
    async fn division_invalidation_is_scoped() {
        let (service, cache, [d1_key, d2_key, e1_key]) = seeded_service().await;

        let removed = service.invalidate_organization(Some("D1"), None, None).await;
        assert_eq!(removed, 1);

        assert!(cache.get(&d1_key).await.unwrap().is_none());
        assert!(cache.get(&d2_key).await.unwrap().is_some());
        assert!(cache.get(&e1_key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn employee_invalidation_clears_individual_and_all_group_keys() {
        let (service, cache, [d1_key, d2_key, e1_key]) = seeded_service().await;

        let removed = service.invalidate_employee("E1").await;
        assert_eq!(removed, 3);

        assert!(cache.get(&d1_key).await.unwrap().is_none());
        assert!(cache.get(&d2_key).await.unwrap().is_none());
        assert!(cache.get(&e1_key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn scope_invalidation_patterns() {
        let (service, cache, [d1_key, d2_key, e1_key]) = seeded_service().await;

        assert_eq!(service.invalidate_all(InvalidationScope::Individual).await, 1);
        assert!(cache.get(&e1_key).await.unwrap().is_none());
        assert!(cache.get(&d1_key).await.unwrap().is_some());

        assert_eq!(service.invalidate_all(InvalidationScope::Group).await, 2);
        assert!(cache.get(&d2_key).await.unwrap().is_none());

        assert_eq!(service.invalidate_all(InvalidationScope::All).await, 0);
    }

    #[tokio::test]
    async fn failing_cache_invalidation_degrades_to_zero() {
        let service = ReportService::new(
            Arc::new(MemStore::new(vec![])),
            Arc::new(FailingCache),
            Duration::from_millis(250),
            50_000,
        );

        assert_eq!(service.invalidate_employee("E1").await, 0);
        assert_eq!(service.invalidate_all(InvalidationScope::All).await, 0);
    }

    #[tokio::test]
    async fn stats_reset_zeroes_counters() {
        let store = MemStore::new(vec![punch("E1", "Asha", "D1", 26, 8, "IN")]);
        let service = service_with(store, Arc::new(MemoryCache::default()));

        service
            .generate_report(&request("2026-01-26", "2026-01-26", "none"))
            .await
            .unwrap();
        assert!(service.stats().misses >= 1);

        service.reset_stats();
        let stats = service.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    // -- cached_lookup --------------------------------------------------------

    #[tokio::test]
    async fn cached_lookup_loads_once_then_hits() {
        let cache = Arc::new(MemoryCache::default());
        let service = service_with(MemStore::new(vec![]), Arc::clone(&cache));

        let loads = AtomicUsize::new(0);
        let load = || async {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(vec!["D1".to_string(), "D2".to_string()])
        };

        let key = "attendance-report:hierarchy:divisions";
        let first: Vec<String> = service
            .cached_lookup(key, Duration::from_secs(600), load)
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        wait_for_key(&cache, key).await;

        let load_again = || async {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(Vec::new())
        };
        let second: Vec<String> = service
            .cached_lookup(key, Duration::from_secs(600), load_again)
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
