use thiserror::Error;

use crate::aggregator::Endpoint;
use crate::db::models::Sport;
use crate::providers::ProviderId;

/// How the orchestrator treats a failed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider cannot serve this sport/endpoint under the current plan.
    PlanRestricted,
    /// Timeout, connection error, 5xx or an unusable payload.
    TransientFailure,
}

/// Classified provider failure. Raw transport errors never leave the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider} refused the request under the current plan (HTTP {status})")]
    PlanRestricted { provider: ProviderId, status: u16 },

    #[error("{provider} does not serve {sport}")]
    Unsupported { provider: ProviderId, sport: Sport },

    #[error("{provider} request failed: {reason}")]
    Transient { provider: ProviderId, reason: String },

    #[error("{provider} returned a malformed payload: {reason}")]
    MalformedPayload { provider: ProviderId, reason: String },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderId {
        match self {
            ProviderError::PlanRestricted { provider, .. }
            | ProviderError::Unsupported { provider, .. }
            | ProviderError::Transient { provider, .. }
            | ProviderError::MalformedPayload { provider, .. } => *provider,
        }
    }

    /// Malformed payloads are handled like transient failures.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::PlanRestricted { .. } | ProviderError::Unsupported { .. } => {
                FailureKind::PlanRestricted
            }
            ProviderError::Transient { .. } | ProviderError::MalformedPayload { .. } => {
                FailureKind::TransientFailure
            }
        }
    }

    /// Short label used in response warnings.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderError::PlanRestricted { .. } => "plan restricted",
            ProviderError::Unsupported { .. } => "sport not supported",
            ProviderError::Transient { .. } => "unavailable",
            ProviderError::MalformedPayload { .. } => "malformed response",
        }
    }
}

/// Payload lacks the minimum identity fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("payload has no `{0}` field")]
    MissingData(&'static str),

    #[error("record {index} has no match id")]
    MissingMatchId { index: usize },

    #[error("match {match_id} has no teams")]
    MissingTeams { match_id: String },

    #[error("no {sport} mapping for {provider}")]
    NoMapping { provider: ProviderId, sport: Sport },
}

impl NormalizeError {
    pub fn into_provider_error(self, provider: ProviderId) -> ProviderError {
        ProviderError::MalformedPayload {
            provider,
            reason: self.to_string(),
        }
    }
}

/// Rejected before reaching the orchestrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown sport '{0}', expected cricket or football")]
    UnknownSport(String),

    #[error("{0} requests need a match id")]
    MissingMatchId(Endpoint),

    #[error("{0} is not a list endpoint")]
    NotAList(Endpoint),
}
