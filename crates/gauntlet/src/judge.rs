//! Batch judgment: prompt a batch of pairs, parse the oracle's verdict
//! array, and degrade to random winners when the reply is unusable.
//!
//! The oracle answers with a JSON-style array of 1s and 2s, one per pair,
//! usually wrapped in prose. Parsing tolerates the prose; any validation
//! failure (bad JSON, wrong length, index outside 1/2) resolves the *whole*
//! batch per the configured fallback policy — never pair-by-pair.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::TournamentError;
use crate::oracle::Oracle;
use crate::types::{Candidate, Pair};

/// What to do when the oracle's reply fails validation.
///
/// Transport failures are never covered by this policy; they always abort
/// the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Pick one winner per pair uniformly at random (availability over
    /// correctness; matches the hosted service's behavior).
    #[default]
    Random,
    /// Surface the validation failure as `TournamentError::InvalidVerdict`.
    FailFast,
}

/// Validation failures on the oracle's answer. Internal: resolved locally
/// by the fallback policy, never surfaced under `FallbackPolicy::Random`.
#[derive(Debug, Error)]
enum VerdictParseError {
    #[error("no JSON array found in reply")]
    NoArray,

    #[error("reply is not a JSON integer array: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("expected {expected} winners, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("invalid winner index {0}, expected 1 or 2")]
    BadIndex(i64),
}

/// Build the comparison prompt for one batch, enumerating pairs 1-based.
pub fn build_prompt(batch: &[Pair], role: &str) -> String {
    let mut prompt = format!(
        "Compare these pairs for a {role} role and return only an array indicating \
         the winner of each pair (1 for first candidate, 2 for second candidate):\n\n"
    );

    for (i, pair) in batch.iter().enumerate() {
        prompt.push_str(&format!("Pair {}:\n", i + 1));
        prompt.push_str(&format!(
            "Candidate 1: {} - {}\n",
            pair.first.name, pair.first.intro
        ));
        prompt.push_str(&format!(
            "Candidate 2: {} - {}\n\n",
            pair.second.name, pair.second.intro
        ));
    }

    prompt.push_str(&format!(
        "Return only: [1,2,1] (example format for {} pairs)",
        batch.len()
    ));
    prompt
}

/// Extract the winner-index array from the oracle's answer.
///
/// A fully bracketed answer parses directly; otherwise the substring from
/// the first `[` to the last `]` is tried, tolerating prose around the
/// array.
fn parse_winner_indices(answer: &str, expected: usize) -> Result<Vec<u8>, VerdictParseError> {
    let trimmed = answer.trim();
    let slice = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        trimmed
    } else {
        let start = trimmed.find('[').ok_or(VerdictParseError::NoArray)?;
        let end = trimmed.rfind(']').ok_or(VerdictParseError::NoArray)?;
        if end < start {
            return Err(VerdictParseError::NoArray);
        }
        &trimmed[start..=end]
    };

    let raw: Vec<i64> = serde_json::from_str(slice)?;
    if raw.len() != expected {
        return Err(VerdictParseError::WrongLength {
            expected,
            got: raw.len(),
        });
    }

    raw.into_iter()
        .map(|index| match index {
            1 => Ok(1),
            2 => Ok(2),
            other => Err(VerdictParseError::BadIndex(other)),
        })
        .collect()
}

/// Judge one batch of pairs, returning exactly one winner per pair in batch
/// order. Every winner is one of the two candidates of its pair.
///
/// Oracle transport errors propagate unconditionally; only reply-validation
/// failures go through the fallback policy.
pub async fn judge_batch(
    oracle: &dyn Oracle,
    batch: &[Pair],
    role: &str,
    policy: FallbackPolicy,
) -> Result<Vec<Candidate>, TournamentError> {
    let prompt = build_prompt(batch, role);
    let verdict = oracle.judge(&prompt).await?;

    if let Some(rationale) = &verdict.rationale {
        debug!(chars = rationale.len(), "Oracle emitted a rationale block");
    }

    match parse_winner_indices(&verdict.answer, batch.len()) {
        Ok(indices) => Ok(batch
            .iter()
            .zip(indices)
            .map(|(pair, index)| {
                if index == 1 {
                    pair.first.clone()
                } else {
                    pair.second.clone()
                }
            })
            .collect()),
        Err(err) => match policy {
            FallbackPolicy::FailFast => Err(TournamentError::InvalidVerdict(err.to_string())),
            FallbackPolicy::Random => {
                warn!(
                    error = %err,
                    reply = %verdict.answer,
                    pairs = batch.len(),
                    "Unusable oracle reply, picking batch winners at random"
                );
                let mut rng = rand::thread_rng();
                Ok(batch
                    .iter()
                    .map(|pair| {
                        if rng.gen_bool(0.5) {
                            pair.first.clone()
                        } else {
                            pair.second.clone()
                        }
                    })
                    .collect())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::oracle::{OracleError, Verdict};

    /// Oracle that returns the same canned answer for every prompt.
    struct FixedOracle(&'static str);

    #[async_trait]
    impl Oracle for FixedOracle {
        async fn judge(&self, _prompt: &str) -> Result<Verdict, OracleError> {
            Ok(Verdict {
                answer: self.0.to_string(),
                rationale: None,
            })
        }
    }

    /// Oracle that always fails at the transport level.
    struct DownOracle;

    #[async_trait]
    impl Oracle for DownOracle {
        async fn judge(&self, _prompt: &str) -> Result<Verdict, OracleError> {
            Err(OracleError::RequestFailed("connection refused".to_string()))
        }
    }

    fn two_pair_batch() -> Vec<Pair> {
        vec![
            Pair {
                first: Candidate::new("A", "a"),
                second: Candidate::new("B", "b"),
            },
            Pair {
                first: Candidate::new("C", "c"),
                second: Candidate::new("D", "d"),
            },
        ]
    }

    fn assert_winner_from_pair(winner: &Candidate, pair: &Pair) {
        assert!(
            *winner == pair.first || *winner == pair.second,
            "winner {:?} not drawn from its pair",
            winner.name
        );
    }

    #[test]
    fn test_build_prompt_enumerates_pairs() {
        let batch = two_pair_batch();
        let prompt = build_prompt(&batch, "software engineering");

        assert!(prompt.contains("software engineering"));
        assert!(prompt.contains("Pair 1:"));
        assert!(prompt.contains("Pair 2:"));
        assert!(prompt.contains("Candidate 1: A - a"));
        assert!(prompt.contains("Candidate 2: D - d"));
        assert!(prompt.contains("example format for 2 pairs"));
    }

    #[test]
    fn test_parse_bare_array() {
        assert_eq!(parse_winner_indices("[1,2]", 2).unwrap(), vec![1, 2]);
        assert_eq!(parse_winner_indices("  [2, 1]\n", 2).unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_parse_array_embedded_in_prose() {
        let indices =
            parse_winner_indices("I think the winners are [1,2] based on experience.", 2).unwrap();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_parse_rejects_missing_array() {
        assert!(matches!(
            parse_winner_indices("no verdict today", 2),
            Err(VerdictParseError::NoArray)
        ));
        assert!(matches!(
            parse_winner_indices("] backwards [", 2),
            Err(VerdictParseError::NoArray)
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            parse_winner_indices("[1,2,3]", 2),
            Err(VerdictParseError::WrongLength {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_index() {
        assert!(matches!(
            parse_winner_indices("[1,3]", 2),
            Err(VerdictParseError::BadIndex(3))
        ));
        assert!(matches!(
            parse_winner_indices("[0,2]", 2),
            Err(VerdictParseError::BadIndex(0))
        ));
    }

    #[test]
    fn test_parse_rejects_non_integer_elements() {
        assert!(matches!(
            parse_winner_indices(r#"[1,"2"]"#, 2),
            Err(VerdictParseError::BadJson(_))
        ));
    }

    #[tokio::test]
    async fn test_judge_batch_maps_indices_to_candidates() {
        let batch = two_pair_batch();
        let winners = judge_batch(
            &FixedOracle("[1,2]"),
            &batch,
            "software engineering",
            FallbackPolicy::Random,
        )
        .await
        .unwrap();

        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0], batch[0].first);
        assert_eq!(winners[1], batch[1].second);
    }

    #[tokio::test]
    async fn test_judge_batch_accepts_prose_wrapped_array() {
        let batch = two_pair_batch();
        let winners = judge_batch(
            &FixedOracle("I think the winners are [1,2] based on experience."),
            &batch,
            "software engineering",
            FallbackPolicy::FailFast,
        )
        .await
        .unwrap();

        // FailFast would error if the bracket scan had not succeeded.
        assert_eq!(winners[0], batch[0].first);
        assert_eq!(winners[1], batch[1].second);
    }

    #[tokio::test]
    async fn test_judge_batch_falls_back_on_length_mismatch() {
        let batch = two_pair_batch();
        let winners = judge_batch(
            &FixedOracle("[1,2,3]"),
            &batch,
            "software engineering",
            FallbackPolicy::Random,
        )
        .await
        .unwrap();

        assert_eq!(winners.len(), 2);
        for (winner, pair) in winners.iter().zip(&batch) {
            assert_winner_from_pair(winner, pair);
        }
    }

    #[tokio::test]
    async fn test_judge_batch_falls_back_on_garbage_reply() {
        let batch = two_pair_batch();
        for reply in ["not even close", "[1,5]", "{\"winner\": 1}"] {
            let winners = judge_batch(
                &FixedOracle(reply),
                &batch,
                "software engineering",
                FallbackPolicy::Random,
            )
            .await
            .unwrap();

            assert_eq!(winners.len(), 2);
            for (winner, pair) in winners.iter().zip(&batch) {
                assert_winner_from_pair(winner, pair);
            }
        }
    }

    #[tokio::test]
    async fn test_judge_batch_fail_fast_surfaces_validation_error() {
        let batch = two_pair_batch();
        let err = judge_batch(
            &FixedOracle("[1,2,3]"),
            &batch,
            "software engineering",
            FallbackPolicy::FailFast,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TournamentError::InvalidVerdict(_)));
    }

    #[tokio::test]
    async fn test_judge_batch_propagates_oracle_failure() {
        let batch = two_pair_batch();
        let err = judge_batch(
            &DownOracle,
            &batch,
            "software engineering",
            FallbackPolicy::Random,
        )
        .await
        .unwrap_err();

        // Transport failures never trigger the random fallback.
        assert!(matches!(err, TournamentError::Oracle(_)));
    }
}
