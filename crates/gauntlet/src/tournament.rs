//! Tournament driver — runs single-elimination rounds until one candidate
//! remains.
//!
//! Each round shuffles the pool into pairs, chunks the pairs into batches,
//! judges every batch strictly in sequence (sleeping between consecutive
//! batches as a rate-limit courtesy to the oracle), and carries the winners
//! into the next round. The elimination tree is an append-only log; round
//! records are never revised once pushed.

use std::time::Duration;

use tracing::info;

use crate::bracket::{make_batches, make_pairs};
use crate::error::TournamentError;
use crate::judge::{judge_batch, FallbackPolicy};
use crate::oracle::Oracle;
use crate::types::{Candidate, MatchRecord, RoundRecord, TournamentResult};

/// Per-invocation tournament settings. Owned by the caller; there is no
/// ambient shared instance.
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// Pairs per oracle prompt (must be even).
    pub batch_size: usize,
    /// Role description the oracle judges candidates against.
    pub role: String,
    /// Pause between consecutive batches within a round.
    pub delay: Duration,
    /// Policy for unusable oracle replies.
    pub fallback: FallbackPolicy,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            role: "software engineering".to_string(),
            delay: Duration::from_secs(2),
            fallback: FallbackPolicy::Random,
        }
    }
}

/// Run a full single-elimination tournament over `candidates`.
///
/// A pool of exactly one is already decided: that candidate is returned as
/// champion with an empty tree. Otherwise the pool size must be even, and
/// halves every round until one candidate remains.
pub async fn run_tournament(
    oracle: &dyn Oracle,
    candidates: Vec<Candidate>,
    config: &TournamentConfig,
) -> Result<TournamentResult, TournamentError> {
    if candidates.is_empty() {
        return Err(TournamentError::NoCandidates);
    }

    let mut pool = candidates;
    if pool.len() == 1 {
        return Ok(TournamentResult {
            champion: pool.remove(0),
            elimination_tree: Vec::new(),
        });
    }
    if pool.len() % 2 != 0 {
        return Err(TournamentError::OddCandidates(pool.len()));
    }

    let mut elimination_tree = Vec::new();
    let mut round = 1u32;

    while pool.len() > 1 {
        let pairs = make_pairs(&pool)?;
        let batches = make_batches(pairs, config.batch_size)?;
        let total_batches = batches.len();

        info!(
            round,
            entrants = pool.len(),
            batches = total_batches,
            "Starting round"
        );

        let mut matches = Vec::with_capacity(pool.len() / 2);
        let mut winners = Vec::with_capacity(pool.len() / 2);

        for (batch_index, batch) in batches.into_iter().enumerate() {
            let batch_number = batch_index + 1;
            let batch_winners = judge_batch(oracle, &batch, &config.role, config.fallback).await?;

            for (pair, winner) in batch.iter().zip(&batch_winners) {
                matches.push(MatchRecord {
                    candidate1: pair.first.clone(),
                    candidate2: pair.second.clone(),
                    winner: winner.clone(),
                    batch: batch_number,
                });
            }
            winners.extend(batch_winners);

            if batch_number < total_batches {
                tokio::time::sleep(config.delay).await;
            }
        }

        elimination_tree.push(RoundRecord {
            round,
            matches,
            total_batches,
        });

        pool = winners;
        round += 1;
    }

    let champion = pool.remove(0);
    info!(champion = %champion.name, rounds = elimination_tree.len(), "Tournament complete");

    Ok(TournamentResult {
        champion,
        elimination_tree,
    })
}
