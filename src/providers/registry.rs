use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::ProviderClient;
use crate::db::models::Sport;

/// Position of a provider in a sport's fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
}

impl Role {
    /// Order in which tiers are tried for one request.
    pub const FALLBACK_ORDER: [Role; 2] = [Role::Primary, Role::Secondary];
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealth {
    pub provider: String,
    pub role: Role,
    pub healthy: bool,
}

/// Static provider table keyed by `(sport, role)`.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<(Sport, Role), Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, sport: Sport, role: Role, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert((sport, role), client);
        self
    }

    pub fn get(&self, sport: Sport, role: Role) -> Option<&Arc<dyn ProviderClient>> {
        self.clients.get(&(sport, role))
    }

    /// Registered tiers for `sport`, in fallback order.
    pub fn tiers(&self, sport: Sport) -> Vec<(Role, Arc<dyn ProviderClient>)> {
        Role::FALLBACK_ORDER
            .iter()
            .filter_map(|role| self.get(sport, *role).map(|c| (*role, Arc::clone(c))))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Probe every registered tier for `sport` concurrently.
    pub async fn health(&self, sport: Sport) -> Vec<ProviderHealth> {
        let probes = self.tiers(sport).into_iter().map(|(role, client)| async move {
            ProviderHealth {
                provider: client.id().to_string(),
                role,
                healthy: client.health_check(sport).await,
            }
        });
        futures_util::future::join_all(probes).await
    }
}
