//! Error taxonomy for cache construction and operations.
//!
//! Construction-time errors (`UnknownBackendType`, `InvalidConfig`) propagate
//! to the factory caller. Per-operation errors (`BackendUnavailable`,
//! `PartialWriteFailure`) propagate to the caller of get/set/delete.
//! `ConfigurationRejected` is produced by the detached Redis bootstrap task
//! and is only ever observed through logging.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type CacheResult<T> = Result<T, CacheError>;

/// A single failed tier write inside a multi-tier fan-out.
#[derive(Debug)]
pub struct TierFailure {
    /// Index of the tier in configuration order (0 = fastest).
    pub tier: usize,
    /// Backend name of the failing tier.
    pub backend: &'static str,
    /// Rendered cause of the failure.
    pub error: String,
}

#[derive(Debug, Error)]
pub enum CacheError {
    /// The `type` field of a declarative configuration named no known backend.
    #[error("unknown store type: '{0}'")]
    UnknownBackendType(String),

    /// The configuration was recognized but structurally invalid.
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// A server-side bootstrap directive was not accepted.
    #[error("configuration directive '{directive}' rejected: {reason}")]
    ConfigurationRejected { directive: String, reason: String },

    /// The backend connection could not service the request.
    #[error("{backend} backend unavailable")]
    BackendUnavailable {
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A multi-tier fan-out completed with at least one failed tier.
    /// Tiers that succeeded are not rolled back.
    #[error("{operation} failed on {} of {total} tiers (indices {:?})", .failures.len(), failed_tiers(.failures))]
    PartialWriteFailure {
        operation: &'static str,
        total: usize,
        failures: Vec<TierFailure>,
    },
}

fn failed_tiers(failures: &[TierFailure]) -> Vec<usize> {
    failures.iter().map(|f| f.tier).collect()
}

impl CacheError {
    /// Tier indices that failed, for `PartialWriteFailure`; empty otherwise.
    #[must_use]
    pub fn failed_tiers(&self) -> Vec<usize> {
        match self {
            Self::PartialWriteFailure { failures, .. } => failed_tiers(failures),
            _ => Vec::new(),
        }
    }
}
