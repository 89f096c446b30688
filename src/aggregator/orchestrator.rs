//! Tiered read path: cache → primary provider → secondary provider → durable snapshot.
//!
//! ```text
//!  CACHE_CHECK ──hit──────────────────────────────────────────▶ RESPOND
//!      │ miss
//!      ▼
//!  PRIMARY_FETCH ──ok──▶ normalize ──▶ cache.set(ttl) ─────────▶ RESPOND
//!      │ PlanRestricted / TransientFailure
//!      ▼
//!  SECONDARY_FETCH (cricket only) ──ok──▶ normalize ──▶ cache ─▶ RESPOND
//!      │ failed / not registered
//!      ▼
//!  SNAPSHOT_FALLBACK ──▶ items + warning (never an error) ─────▶ RESPOND
//! ```
//!
//! Each tier is attempted at most once per request; retries happen on the next
//! cache-miss cycle. Concurrent misses on the same key share one resolution.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::singleflight::SingleFlight;
use super::{Endpoint, MatchQuery, MatchResponse, SNAPSHOT_SOURCE};
use crate::cache::{ttl_for, CacheStore, Environment};
use crate::db::models::CanonicalMatch;
use crate::db::SnapshotStore;
use crate::error::ProviderError;
use crate::normalize::normalize;
use crate::providers::{ProviderClient, ProviderPayload, ProviderRegistry, Role};

pub struct Orchestrator {
    registry: ProviderRegistry,
    cache: Arc<dyn CacheStore>,
    snapshots: Arc<dyn SnapshotStore>,
    environment: Environment,
    provider_timeout: Duration,
    inflight: SingleFlight<MatchResponse>,
}

impl Orchestrator {
    pub fn new(
        registry: ProviderRegistry,
        cache: Arc<dyn CacheStore>,
        snapshots: Arc<dyn SnapshotStore>,
        environment: Environment,
        provider_timeout: Duration,
    ) -> Self {
        Orchestrator {
            registry,
            cache,
            snapshots,
            environment,
            provider_timeout,
            inflight: SingleFlight::new(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Resolve one logical request. Always produces an envelope.
    pub async fn fetch(&self, query: &MatchQuery) -> MatchResponse {
        self.fetch_view(query).await.paged(query)
    }

    /// The full, unpaginated view behind `query`. Every page of a view, and the
    /// snapshot ingest job, share this cache entry and its upstream resolution.
    pub async fn fetch_view(&self, query: &MatchQuery) -> MatchResponse {
        let key = query.cache_key();

        if let Some(hit) = self.cached(&key).await {
            debug!("Cache hit {}", key);
            return hit;
        }
        debug!("Cache miss {}", key);

        self.inflight
            .run(&key, || self.resolve(query, &key))
            .await
    }

    async fn cached(&self, key: &str) -> Option<MatchResponse> {
        let bytes = self.cache.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(resp) => Some(resp),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn resolve(&self, query: &MatchQuery, key: &str) -> MatchResponse {
        let mut failures: Vec<ProviderError> = Vec::new();

        for (role, client) in self.registry.tiers(query.sport()) {
            match self.fetch_tier(client.as_ref(), query).await {
                Ok(matches) => {
                    if role == Role::Secondary {
                        info!(
                            "{} {} served by secondary provider {}",
                            query.sport(),
                            query.endpoint(),
                            client.id()
                        );
                    }
                    return self.respond_fresh(query, key, client.id().to_string(), matches).await;
                }
                Err(err) => {
                    warn!(
                        "{:?} tier failed for {} {} ({:?}): {}",
                        role,
                        query.sport(),
                        query.endpoint(),
                        err.kind(),
                        err
                    );
                    failures.push(err);
                }
            }
        }

        self.snapshot_fallback(query, &failures).await
    }

    /// One call to one provider, bounded by the provider timeout, then normalized.
    async fn fetch_tier(
        &self,
        client: &dyn ProviderClient,
        query: &MatchQuery,
    ) -> Result<Vec<CanonicalMatch>, ProviderError> {
        let provider = client.id();
        let payload = tokio::time::timeout(self.provider_timeout, call_endpoint(client, query))
            .await
            .map_err(|_| ProviderError::Transient {
                provider,
                reason: format!("timed out after {:?}", self.provider_timeout),
            })??;

        normalize(&payload).map_err(|e| {
            warn!("{} payload rejected by normalizer: {}", provider, e);
            e.into_provider_error(provider)
        })
    }

    async fn respond_fresh(
        &self,
        query: &MatchQuery,
        key: &str,
        source: String,
        matches: Vec<CanonicalMatch>,
    ) -> MatchResponse {
        let response = MatchResponse::assemble(query.endpoint(), matches, Some(source), None);

        match serde_json::to_vec(&response) {
            Ok(bytes) => {
                let ttl = ttl_for(query.endpoint(), self.environment);
                self.cache.set(key, bytes, ttl).await;
                debug!("Cached {} for {:?}", key, ttl);
            }
            Err(e) => error!("Failed to serialize response for {}: {}", key, e),
        }
        response
    }

    async fn snapshot_fallback(&self, query: &MatchQuery, failures: &[ProviderError]) -> MatchResponse {
        let warning = describe_failures(query, failures);
        warn!("{}", warning);

        let items = self.read_stored(query).await.unwrap_or_else(|e| {
            error!("Snapshot read failed for {}: {:#}", query.cache_key(), e);
            Vec::new()
        });

        MatchResponse::assemble(
            query.endpoint(),
            items,
            Some(SNAPSHOT_SOURCE.to_string()),
            Some(warning),
        )
    }

    async fn read_stored(&self, query: &MatchQuery) -> anyhow::Result<Vec<CanonicalMatch>> {
        if let Some(id) = query.match_id() {
            let found = self.snapshots.read_match(query.sport(), id).await?;
            return Ok(found.into_iter().collect());
        }
        let mut rows = Vec::new();
        for status in query.endpoint().snapshot_statuses() {
            rows.extend(self.snapshots.read_snapshot(query.sport(), *status).await?);
        }
        Ok(rows)
    }
}

async fn call_endpoint(
    client: &dyn ProviderClient,
    query: &MatchQuery,
) -> Result<ProviderPayload, ProviderError> {
    let sport = query.sport();
    let filters = query.filters();
    let id = query.match_id().unwrap_or_default();
    match query.endpoint() {
        Endpoint::Live => client.get_live(sport, filters).await,
        Endpoint::Upcoming => client.get_upcoming(sport, filters).await,
        Endpoint::Completed => client.get_completed(sport, filters).await,
        Endpoint::Detail => client.get_detail(sport, id).await,
        Endpoint::Commentary => client.get_commentary(sport, id).await,
    }
}

fn describe_failures(query: &MatchQuery, failures: &[ProviderError]) -> String {
    if failures.is_empty() {
        return format!(
            "no provider registered for {} {}; serving stored snapshot",
            query.sport(),
            query.endpoint()
        );
    }
    let detail = failures
        .iter()
        .map(|f| format!("{}: {}", f.provider(), f.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "upstream providers failed for {} {} ({}); serving stored snapshot",
        query.sport(),
        query.endpoint(),
        detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MatchFilters;
    use crate::cache::MemoryCache;
    use crate::db::models::{MatchStatus, Sport, TeamRef, Teams, Venue};
    use crate::providers::ProviderId;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ── Fakes ────────────────────────────────────────────────────────────────

    enum Outcome {
        Body(Value),
        Fail(ProviderError),
    }

    struct FakeClient {
        id: ProviderId,
        outcome: Outcome,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeClient {
        fn ok(id: ProviderId, body: Value) -> Arc<Self> {
            Arc::new(FakeClient {
                id,
                outcome: Outcome::Body(body),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: ProviderId, err: ProviderError) -> Arc<Self> {
            Arc::new(FakeClient {
                id,
                outcome: Outcome::Fail(err),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(id: ProviderId, body: Value, delay: Duration) -> Arc<Self> {
            Arc::new(FakeClient {
                id,
                outcome: Outcome::Body(body),
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond(&self, sport: Sport) -> Result<ProviderPayload, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.outcome {
                Outcome::Body(body) => Ok(ProviderPayload {
                    provider: self.id,
                    sport,
                    body: body.clone(),
                }),
                Outcome::Fail(err) => Err(err.clone()),
            }
        }
    }

    #[async_trait]
    impl ProviderClient for FakeClient {
        fn id(&self) -> ProviderId {
            self.id
        }
        async fn get_live(&self, s: Sport, _: &MatchFilters) -> Result<ProviderPayload, ProviderError> {
            self.respond(s).await
        }
        async fn get_upcoming(&self, s: Sport, _: &MatchFilters) -> Result<ProviderPayload, ProviderError> {
            self.respond(s).await
        }
        async fn get_completed(&self, s: Sport, _: &MatchFilters) -> Result<ProviderPayload, ProviderError> {
            self.respond(s).await
        }
        async fn get_detail(&self, s: Sport, _: &str) -> Result<ProviderPayload, ProviderError> {
            self.respond(s).await
        }
        async fn get_commentary(&self, s: Sport, _: &str) -> Result<ProviderPayload, ProviderError> {
            self.respond(s).await
        }
        async fn health_check(&self, _: Sport) -> bool {
            matches!(self.outcome, Outcome::Body(_))
        }
    }

    #[derive(Default)]
    struct FakeSnapshots {
        rows: Vec<CanonicalMatch>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotStore for FakeSnapshots {
        async fn read_snapshot(&self, sport: Sport, status: MatchStatus) -> anyhow::Result<Vec<CanonicalMatch>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|m| m.sport == sport && m.status == status)
                .cloned()
                .collect())
        }
        async fn read_match(&self, sport: Sport, id: &str) -> anyhow::Result<Option<CanonicalMatch>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.iter().find(|m| m.sport == sport && m.match_id == id).cloned())
        }
        async fn write_snapshot(&self, matches: &[CanonicalMatch]) -> anyhow::Result<usize> {
            Ok(matches.len())
        }
    }

    /// Records the TTL of every write.
    #[derive(Default)]
    struct RecordingCache {
        inner: MemoryCache,
        ttls: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl CacheStore for RecordingCache {
        async fn get(&self, key: &str) -> Option<Vec<u8>> {
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
            self.ttls.lock().unwrap().push(ttl);
            self.inner.set(key, value, ttl).await
        }
        async fn delete(&self, key: &str) -> bool {
            self.inner.delete(key).await
        }
        async fn keys_matching(&self, pattern: &str) -> Vec<String> {
            self.inner.keys_matching(pattern).await
        }
    }

    // ── Fixtures ─────────────────────────────────────────────────────────────

    fn sportmonks_live() -> Value {
        json!({"data": [
            {"id": 1, "state_id": 3, "participants": [{"name": "India"}, {"name": "Australia"}],
             "scores": [{"score": 120}, {"score": 95}]},
            {"id": 2, "state_id": 1, "participants": [{"name": "England"}, {"name": "Pakistan"}]}
        ]})
    }

    fn cricketdata_live() -> Value {
        json!({"status": "success", "data": [
            {"id": "cd-1", "teams": ["India", "Australia"], "matchStarted": true, "matchEnded": false,
             "score": [{"r": 120, "w": 2, "o": 14.1, "inning": "India Inning 1"}]}
        ]})
    }

    fn forbidden() -> ProviderError {
        ProviderError::PlanRestricted {
            provider: ProviderId::SportMonks,
            status: 403,
        }
    }

    fn outage(provider: ProviderId) -> ProviderError {
        ProviderError::Transient {
            provider,
            reason: "HTTP 503 Service Unavailable".into(),
        }
    }

    fn stored(id: &str, status: MatchStatus) -> CanonicalMatch {
        CanonicalMatch {
            match_id: id.into(),
            sport: Sport::Cricket,
            status,
            format: None,
            teams: Teams {
                home: TeamRef::to_be_confirmed(),
                away: TeamRef::to_be_confirmed(),
            },
            venue: Venue::default(),
            start_time: Utc::now(),
            current_score: None,
            final_score: None,
            series: "Stored".into(),
            source_provider: "sportmonks".into(),
            result_note: None,
            commentary: Vec::new(),
        }
    }

    fn live_cricket() -> MatchQuery {
        MatchQuery::list(Sport::Cricket, Endpoint::Live, MatchFilters::default()).unwrap()
    }

    struct Harness {
        orchestrator: Orchestrator,
        cache: Arc<RecordingCache>,
        snapshots: Arc<FakeSnapshots>,
    }

    fn harness(
        primary: Option<Arc<FakeClient>>,
        secondary: Option<Arc<FakeClient>>,
        rows: Vec<CanonicalMatch>,
        environment: Environment,
    ) -> Harness {
        let mut registry = ProviderRegistry::new();
        if let Some(p) = primary {
            registry = registry
                .register(Sport::Cricket, Role::Primary, p.clone())
                .register(Sport::Football, Role::Primary, p);
        }
        if let Some(s) = secondary {
            registry = registry.register(Sport::Cricket, Role::Secondary, s);
        }
        let cache = Arc::new(RecordingCache::default());
        let snapshots = Arc::new(FakeSnapshots {
            rows,
            ..Default::default()
        });
        let orchestrator = Orchestrator::new(
            registry,
            cache.clone(),
            snapshots.clone(),
            environment,
            Duration::from_millis(200),
        );
        Harness {
            orchestrator,
            cache,
            snapshots,
        }
    }

    // ── Tests ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_primary_success_keeps_only_live_matches() {
        let primary = FakeClient::ok(ProviderId::SportMonks, sportmonks_live());
        let h = harness(Some(primary.clone()), None, vec![], Environment::Development);

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert_eq!(resp.source.as_deref(), Some("sportmonks"));
        assert!(resp.warning.is_none());
        assert!(resp.pagination.is_none());
        assert_eq!(resp.items.len(), 1);
        let score = resp.items[0].current_score.as_ref().unwrap();
        assert_eq!((score.home, score.away), (120, 95));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_plan_restricted_primary_falls_back_to_secondary_once() {
        let primary = FakeClient::failing(ProviderId::SportMonks, forbidden());
        let secondary = FakeClient::ok(ProviderId::CricketData, cricketdata_live());
        let h = harness(
            Some(primary.clone()),
            Some(secondary.clone()),
            vec![],
            Environment::Development,
        );

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(resp.source.as_deref(), Some("cricketdata"));
        assert!(resp.warning.is_none());
        assert_eq!(resp.items[0].source_provider, "cricketdata");
        assert_eq!(h.snapshots.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers_and_is_byte_identical() {
        let primary = FakeClient::ok(ProviderId::SportMonks, sportmonks_live());
        let h = harness(Some(primary.clone()), None, vec![], Environment::Development);

        let first = h.orchestrator.fetch(&live_cricket()).await;
        let second = h.orchestrator.fetch(&live_cricket()).await;

        assert_eq!(primary.calls(), 1);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_ttl_follows_environment() {
        for (environment, secs) in [(Environment::Production, 900), (Environment::Development, 30)] {
            let primary = FakeClient::ok(ProviderId::SportMonks, sportmonks_live());
            let h = harness(Some(primary), None, vec![], environment);
            h.orchestrator.fetch(&live_cricket()).await;
            assert_eq!(
                *h.cache.ttls.lock().unwrap(),
                vec![Duration::from_secs(secs)]
            );
        }
    }

    #[tokio::test]
    async fn test_total_failure_degrades_to_empty_snapshot_with_warning() {
        let primary = FakeClient::failing(ProviderId::SportMonks, outage(ProviderId::SportMonks));
        let secondary = FakeClient::failing(ProviderId::CricketData, outage(ProviderId::CricketData));
        let h = harness(Some(primary), Some(secondary), vec![], Environment::Production);

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert!(resp.items.is_empty());
        let warning = resp.warning.expect("warning on snapshot path");
        assert!(warning.contains("sportmonks") && warning.contains("cricketdata"));
        assert_eq!(resp.source.as_deref(), Some(SNAPSHOT_SOURCE));
        assert!(h.cache.ttls.lock().unwrap().is_empty(), "snapshot results are not cached");
    }

    #[tokio::test]
    async fn test_snapshot_rows_served_when_providers_fail() {
        let primary = FakeClient::failing(ProviderId::SportMonks, forbidden());
        let rows = vec![
            stored("s1", MatchStatus::Live),
            stored("s2", MatchStatus::Completed),
            stored("s3", MatchStatus::Cancelled),
        ];
        let h = harness(Some(primary), None, rows, Environment::Development);

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].match_id, "s1");
        assert!(resp.warning.is_some());

        let completed =
            MatchQuery::list(Sport::Cricket, Endpoint::Completed, MatchFilters::default()).unwrap();
        let resp = h.orchestrator.fetch(&completed).await;
        let ids: Vec<_> = resp.items.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s3"]);

        let detail = MatchQuery::detail(Sport::Cricket, "s2").unwrap();
        let resp = h.orchestrator.fetch(&detail).await;
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].status, MatchStatus::Completed);
    }

    #[tokio::test]
    async fn test_empty_upstream_is_success_without_warning() {
        let primary = FakeClient::ok(ProviderId::SportMonks, json!({"data": []}));
        let secondary = FakeClient::ok(ProviderId::CricketData, cricketdata_live());
        let h = harness(
            Some(primary),
            Some(secondary.clone()),
            vec![stored("s1", MatchStatus::Live)],
            Environment::Development,
        );

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert!(resp.items.is_empty());
        assert!(resp.warning.is_none());
        assert_eq!(resp.source.as_deref(), Some("sportmonks"));
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_football_has_no_secondary_tier() {
        let primary = FakeClient::failing(ProviderId::SportMonks, forbidden());
        let secondary = FakeClient::ok(ProviderId::CricketData, cricketdata_live());
        let h = harness(
            Some(primary),
            Some(secondary.clone()),
            vec![],
            Environment::Development,
        );

        let query = MatchQuery::list(Sport::Football, Endpoint::Live, MatchFilters::default()).unwrap();
        let resp = h.orchestrator.fetch(&query).await;
        assert_eq!(secondary.calls(), 0);
        assert_eq!(h.snapshots.reads.load(Ordering::SeqCst), 1);
        assert!(resp.warning.unwrap().contains("plan restricted"));
    }

    #[tokio::test]
    async fn test_malformed_primary_payload_falls_back() {
        let primary = FakeClient::ok(ProviderId::SportMonks, json!({"data": [{"state_id": 3}]}));
        let secondary = FakeClient::ok(ProviderId::CricketData, cricketdata_live());
        let h = harness(
            Some(primary),
            Some(secondary.clone()),
            vec![],
            Environment::Development,
        );

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert_eq!(secondary.calls(), 1);
        assert_eq!(resp.source.as_deref(), Some("cricketdata"));
    }

    #[tokio::test]
    async fn test_slow_primary_times_out_into_next_tier() {
        let primary = FakeClient::slow(
            ProviderId::SportMonks,
            sportmonks_live(),
            Duration::from_secs(5),
        );
        let secondary = FakeClient::ok(ProviderId::CricketData, cricketdata_live());
        let h = harness(
            Some(primary),
            Some(secondary.clone()),
            vec![],
            Environment::Development,
        );

        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert_eq!(resp.source.as_deref(), Some("cricketdata"));
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_upstream_call() {
        let primary = FakeClient::slow(
            ProviderId::SportMonks,
            sportmonks_live(),
            Duration::from_millis(50),
        );
        let h = harness(Some(primary.clone()), None, vec![], Environment::Development);

        let query = live_cricket();
        let calls = (0..6).map(|_| h.orchestrator.fetch(&query));
        let responses = futures_util::future::join_all(calls).await;

        assert_eq!(primary.calls(), 1);
        assert!(responses.iter().all(|r| r == &responses[0]));
    }

    #[tokio::test]
    async fn test_no_registered_provider_uses_snapshot() {
        let h = harness(None, None, vec![], Environment::Development);
        let resp = h.orchestrator.fetch(&live_cricket()).await;
        assert!(resp.items.is_empty());
        assert!(resp.warning.unwrap().contains("no provider registered"));
    }

    #[tokio::test]
    async fn test_upcoming_is_paginated() {
        let fixtures: Vec<Value> = (1..=5)
            .map(|i| json!({"id": i, "state_id": 1, "participants": [{"name": "A"}, {"name": "B"}]}))
            .collect();
        let primary = FakeClient::ok(ProviderId::SportMonks, json!({"data": fixtures}));
        let h = harness(Some(primary), None, vec![], Environment::Development);

        let filters = MatchFilters::from_pairs([("page", "2"), ("limit", "2")]);
        let query = MatchQuery::list(Sport::Cricket, Endpoint::Upcoming, filters).unwrap();
        let resp = h.orchestrator.fetch(&query).await;

        let ids: Vec<_> = resp.items.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
        let page = resp.pagination.unwrap();
        assert_eq!((page.current, page.pages, page.total, page.limit), (2, 3, 5, 2));
    }

    #[tokio::test]
    async fn test_pages_of_one_view_share_one_upstream_call() {
        let fixtures: Vec<Value> = (1..=5)
            .map(|i| json!({"id": i, "state_id": 1, "participants": [{"name": "A"}, {"name": "B"}]}))
            .collect();
        let primary = FakeClient::ok(ProviderId::SportMonks, json!({"data": fixtures}));
        let h = harness(Some(primary.clone()), None, vec![], Environment::Production);

        for page in ["1", "2", "3"] {
            let filters = MatchFilters::from_pairs([("page", page), ("limit", "2")]);
            let query = MatchQuery::list(Sport::Cricket, Endpoint::Upcoming, filters).unwrap();
            let resp = h.orchestrator.fetch(&query).await;
            assert_eq!(resp.pagination.unwrap().total, 5);
        }

        assert_eq!(primary.calls(), 1);
        assert_eq!(h.cache.ttls.lock().unwrap().len(), 1);
    }
}
