use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Endpoint, MatchFilters, MatchQuery, Orchestrator};
use crate::db::models::Sport;
use crate::db::SnapshotStore;

const INGEST_ENDPOINTS: [Endpoint; 3] = [Endpoint::Live, Endpoint::Upcoming, Endpoint::Completed];

/// Spawns a background task that periodically pulls every list view through the
/// orchestrator and persists provider-fresh results, so the snapshot fallback has
/// something to serve when all providers are down.
pub fn start_snapshot_ingest(
    orchestrator: Arc<Orchestrator>,
    snapshots: Arc<dyn SnapshotStore>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Snapshot ingest started (interval={:?})", every);
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let written = ingest_once(&orchestrator, snapshots.as_ref()).await;
            debug!("Snapshot ingest cycle wrote {} record(s)", written);
        }
    })
}

/// One refresh cycle over every sport and list view. Returns rows written.
pub async fn ingest_once(orchestrator: &Orchestrator, snapshots: &dyn SnapshotStore) -> usize {
    let mut written = 0;
    for sport in Sport::ALL {
        for endpoint in INGEST_ENDPOINTS {
            let query = match MatchQuery::list(sport, endpoint, MatchFilters::default()) {
                Ok(q) => q,
                Err(e) => {
                    warn!("Skipping ingest of {} {}: {}", sport, endpoint, e);
                    continue;
                }
            };

            // The full view shares its cache entry with every user-facing page.
            let response = orchestrator.fetch_view(&query).await;
            // Snapshot-served responses would only write the snapshot back to itself.
            if response.warning.is_some() || response.items.is_empty() {
                continue;
            }
            match snapshots.write_snapshot(&response.items).await {
                Ok(n) => written += n,
                Err(e) => warn!("Failed to persist {} {} snapshot: {:#}", sport, endpoint, e),
            }
        }
    }
    written
}
