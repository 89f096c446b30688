use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::aggregator::{Endpoint, MatchFilters, MatchQuery, Orchestrator};
use crate::cache::Environment;
use crate::db::models::Sport;
use crate::error::QueryError;
use crate::providers::ProviderHealth;

/// Invalidation pattern used when `DELETE /api/cache` has no `pattern`.
const DEFAULT_INVALIDATION_PATTERN: &str = "matches:*";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Build the Axum router for the match API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/:sport/matches/:segment", get(matches_handler))
        .route("/api/:sport/matches/:segment/commentary", get(commentary_handler))
        .route("/api/:sport/health", get(health_handler))
        .route("/api/cache", delete(invalidate_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn bad_request(err: QueryError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

/// `live`, `upcoming`, `completed` (and their aliases) are list views; any other
/// segment is taken as a match id.
fn parse_matches_request(
    sport: &str,
    segment: &str,
    params: HashMap<String, String>,
) -> Result<MatchQuery, QueryError> {
    let sport: Sport = sport.parse()?;
    match Endpoint::from_list_segment(segment) {
        Some(endpoint) => MatchQuery::list(sport, endpoint, MatchFilters::from_pairs(params)),
        None => MatchQuery::detail(sport, segment),
    }
}

/// GET /api/:sport/matches/live?league=&page=&limit=  |  GET /api/:sport/matches/:id
async fn matches_handler(
    State(state): State<Arc<AppState>>,
    Path((sport, segment)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<crate::aggregator::MatchResponse> {
    let query = parse_matches_request(&sport, &segment, params).map_err(bad_request)?;
    Ok(Json(state.orchestrator.fetch(&query).await))
}

/// GET /api/:sport/matches/:id/commentary
async fn commentary_handler(
    State(state): State<Arc<AppState>>,
    Path((sport, match_id)): Path<(String, String)>,
) -> ApiResult<crate::aggregator::MatchResponse> {
    let sport: Sport = sport.parse().map_err(bad_request)?;
    let query = MatchQuery::commentary(sport, &match_id).map_err(bad_request)?;
    Ok(Json(state.orchestrator.fetch(&query).await))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    sport: Sport,
    environment: Environment,
    providers: Vec<ProviderHealth>,
}

/// GET /api/:sport/health
async fn health_handler(
    State(state): State<Arc<AppState>>,
    Path(sport): Path<String>,
) -> ApiResult<HealthReport> {
    let sport: Sport = sport.parse().map_err(bad_request)?;
    let providers = state.orchestrator.registry().health(sport).await;
    Ok(Json(HealthReport {
        sport,
        environment: state.orchestrator.environment(),
        providers,
    }))
}

#[derive(Debug, Serialize)]
struct InvalidationReport {
    pattern: String,
    removed: usize,
}

/// DELETE /api/cache?pattern=matches:cricket:*
async fn invalidate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<InvalidationReport> {
    let pattern = params
        .get("pattern")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_INVALIDATION_PATTERN)
        .to_string();

    let cache = state.orchestrator.cache();
    let mut removed = 0;
    for key in cache.keys_matching(&pattern).await {
        if cache.delete(&key).await {
            removed += 1;
        }
    }
    info!("Invalidated {} cache entries matching {}", removed, pattern);
    Ok(Json(InvalidationReport { pattern, removed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCache};
    use crate::db::Database;
    use crate::providers::ProviderRegistry;
    use std::time::Duration;

    fn state_with(cache: Arc<MemoryCache>) -> Arc<AppState> {
        let orchestrator = Orchestrator::new(
            ProviderRegistry::new(),
            cache,
            Arc::new(Database::open(":memory:").unwrap()),
            Environment::Development,
            Duration::from_secs(1),
        );
        Arc::new(AppState {
            orchestrator: Arc::new(orchestrator),
        })
    }

    #[test]
    fn test_segment_selects_list_or_detail() {
        let params = HashMap::from([("page".to_string(), "2".to_string())]);
        let q = parse_matches_request("cricket", "fixtures", params).unwrap();
        assert_eq!(q.endpoint(), Endpoint::Upcoming);
        assert_eq!(q.filters().page(), 2);

        let q = parse_matches_request("soccer", "8812", HashMap::new()).unwrap();
        assert_eq!(q.endpoint(), Endpoint::Detail);
        assert_eq!(q.sport(), Sport::Football);
        assert_eq!(q.match_id(), Some("8812"));

        assert!(matches!(
            parse_matches_request("tennis", "live", HashMap::new()),
            Err(QueryError::UnknownSport(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_sport_is_bad_request() {
        let state = state_with(Arc::new(MemoryCache::new()));
        let err = matches_handler(
            State(state),
            Path(("curling".to_string(), "live".to_string())),
            Query(HashMap::new()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_upstreams_still_answer_ok() {
        let state = state_with(Arc::new(MemoryCache::new()));
        let Json(resp) = matches_handler(
            State(state),
            Path(("cricket".to_string(), "live".to_string())),
            Query(HashMap::new()),
        )
        .await
        .unwrap();
        assert!(resp.items.is_empty());
        assert!(resp.warning.is_some());
    }

    #[tokio::test]
    async fn test_invalidation_removes_matching_keys_only() {
        let cache = Arc::new(MemoryCache::new());
        let ttl = Duration::from_secs(60);
        cache.set("matches:cricket:live:-:", b"a".to_vec(), ttl).await;
        cache.set("matches:cricket:upcoming:-:", b"b".to_vec(), ttl).await;
        cache.set("matches:football:live:-:", b"c".to_vec(), ttl).await;
        let state = state_with(cache.clone());

        let params = HashMap::from([("pattern".to_string(), "matches:cricket:*".to_string())]);
        let Json(report) = invalidate_handler(State(state), Query(params)).await.unwrap();

        assert_eq!(report.removed, 2);
        assert_eq!(cache.keys_matching("*").await, vec!["matches:football:live:-:"]);
    }
}
