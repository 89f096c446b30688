use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::aggregator::Endpoint;

/// Deployment environment; selects the TTL column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        })
    }
}

/// Cache lifetime for a response. Production keeps list views far longer so the
/// free-tier upstream quota (~100 requests/day) is not exhausted.
pub fn ttl_for(endpoint: Endpoint, environment: Environment) -> Duration {
    let production = environment == Environment::Production;
    let secs = match endpoint {
        Endpoint::Live if production => 900,
        Endpoint::Live => 30,
        Endpoint::Upcoming if production => 900,
        Endpoint::Upcoming => 300,
        Endpoint::Completed if production => 3600,
        Endpoint::Completed => 900,
        Endpoint::Detail => 60,
        Endpoint::Commentary => 30,
    };
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_table() {
        use Endpoint::*;
        use Environment::*;
        let cases = [
            (Live, Development, 30),
            (Live, Staging, 30),
            (Live, Production, 900),
            (Upcoming, Development, 300),
            (Upcoming, Production, 900),
            (Completed, Staging, 900),
            (Completed, Production, 3600),
            (Detail, Development, 60),
            (Detail, Production, 60),
            (Commentary, Development, 30),
            (Commentary, Production, 30),
        ];
        for (endpoint, env, secs) in cases {
            assert_eq!(ttl_for(endpoint, env), Duration::from_secs(secs), "{endpoint} / {env}");
        }
    }
}
