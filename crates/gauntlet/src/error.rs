//! Error taxonomy for tournament runs.
//!
//! Only oracle-reply validation failures are recovered internally (see the
//! fallback policy in `judge`); everything here propagates to the caller and
//! aborts the run.

use thiserror::Error;

use crate::oracle::OracleError;

/// Errors surfaced by the partitioner, batch judge, and tournament driver.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("number of candidates must be even, got {0}")]
    OddCandidates(usize),

    #[error("batch size must be a positive even number, got {0}")]
    OddBatchSize(usize),

    #[error("candidate list is empty")]
    NoCandidates,

    /// Oracle reply failed validation under the fail-fast policy.
    #[error("oracle verdict rejected: {0}")]
    InvalidVerdict(String),

    /// Transport or configuration failure calling the oracle. Never
    /// recovered by the batch judge; aborts the whole run.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}
