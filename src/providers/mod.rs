pub mod cricketdata;
pub mod http;
pub mod provider;
pub mod registry;
pub mod sportmonks;

pub use cricketdata::CricketData;
pub use provider::{ProviderClient, ProviderPayload};
pub use registry::{ProviderHealth, ProviderRegistry, Role};
pub use sportmonks::SportMonks;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream providers with a known schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Primary cricket + football feed (numeric `state_id`, `participants`, `scores`)
    SportMonks,
    /// Secondary cricket-only feed (`matchStarted`/`matchEnded` flags)
    CricketData,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderId::SportMonks => "sportmonks",
            ProviderId::CricketData => "cricketdata",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
