//! Core data model for the tournament: candidates, pairs, and the
//! append-only match/round records that make up the elimination tree.

use serde::{Deserialize, Serialize};

/// A candidate being ranked by pairwise comparison.
///
/// Only `name` and `intro` are interpreted by the core; any other fields
/// supplied by the caller are carried through unchanged via `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub intro: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, intro: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intro: intro.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Two candidates competing in one comparison. Ordering is significant:
/// `first`/`second` map to comparator indices 1/2 in the oracle prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub first: Candidate,
    pub second: Candidate,
}

/// Outcome of a single judged pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub candidate1: Candidate,
    pub candidate2: Candidate,
    pub winner: Candidate,
    /// 1-based index of the batch this pair was judged in.
    pub batch: usize,
}

/// One full elimination pass halving the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub matches: Vec<MatchRecord>,
    pub total_batches: usize,
}

/// Final output of a tournament run: the champion plus the ordered log of
/// every round's match outcomes, oldest round first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub champion: Candidate,
    pub elimination_tree: Vec<RoundRecord>,
}
