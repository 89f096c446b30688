use async_trait::async_trait;

use super::ProviderId;
use crate::aggregator::MatchFilters;
use crate::db::models::Sport;
use crate::error::ProviderError;

/// Raw provider response, still in the provider's native schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPayload {
    pub provider: ProviderId,
    pub sport: Sport,
    pub body: serde_json::Value,
}

/// Trait that every upstream match provider must implement.
///
/// Implementations make exactly one outbound call per method and never fall back
/// to another provider; failures come back already classified.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn get_live(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError>;

    async fn get_upcoming(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError>;

    async fn get_completed(
        &self,
        sport: Sport,
        filters: &MatchFilters,
    ) -> Result<ProviderPayload, ProviderError>;

    async fn get_detail(&self, sport: Sport, match_id: &str)
        -> Result<ProviderPayload, ProviderError>;

    async fn get_commentary(
        &self,
        sport: Sport,
        match_id: &str,
    ) -> Result<ProviderPayload, ProviderError>;

    async fn health_check(&self, sport: Sport) -> bool;
}
