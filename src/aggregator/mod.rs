pub mod ingest;
pub mod orchestrator;
pub mod query;
pub mod singleflight;

pub use ingest::start_snapshot_ingest;
pub use orchestrator::Orchestrator;
pub use query::{Endpoint, MatchFilters, MatchQuery};

use serde::{Deserialize, Serialize};

use crate::db::models::CanonicalMatch;

/// `source` value on responses served from the durable snapshot.
pub const SNAPSHOT_SOURCE: &str = "snapshot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current: usize,
    pub pages: usize,
    pub total: usize,
    pub limit: usize,
}

/// Envelope returned for every read. Staleness and fallback are signalled only
/// through `source`/`warning`, never through an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub items: Vec<CanonicalMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl MatchResponse {
    /// Keep the records the endpoint admits. This full view is what gets cached.
    pub fn assemble(
        endpoint: Endpoint,
        matches: Vec<CanonicalMatch>,
        source: Option<String>,
        warning: Option<String>,
    ) -> Self {
        let items = matches
            .into_iter()
            .filter(|m| endpoint.admits(m.status))
            .collect();
        MatchResponse {
            items,
            pagination: None,
            source,
            warning,
        }
    }

    /// Cut the page `query` asks for out of a full view. Live views pass through.
    pub fn paged(self, query: &MatchQuery) -> Self {
        if !query.endpoint().is_paginated() {
            return self;
        }
        let filters = query.filters();
        let (items, meta) = paginate(self.items, filters.page(), filters.limit());
        MatchResponse {
            items,
            pagination: Some(meta),
            ..self
        }
    }
}

fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> (Vec<T>, Pagination) {
    let total = items.len();
    let pages = total.div_ceil(limit).max(1);
    let current = page.min(pages);
    let page_items = items
        .into_iter()
        .skip((current - 1) * limit)
        .take(limit)
        .collect();
    (
        page_items,
        Pagination {
            current,
            pages,
            total,
            limit,
        },
    )
}
