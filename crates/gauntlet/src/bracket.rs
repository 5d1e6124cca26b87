//! Pair and batch partitioning.
//!
//! Shuffles the candidate pool into random pairs, then chunks the pairs into
//! fixed-size batches for prompting. Batch size counts *pairs*, not
//! candidates.

use rand::seq::SliceRandom;

use crate::error::TournamentError;
use crate::types::{Candidate, Pair};

/// Shuffle the candidates into random adjacent pairs.
///
/// Operates on a copy; the caller's slice is never reordered. Fails on an
/// odd candidate count.
pub fn make_pairs(candidates: &[Candidate]) -> Result<Vec<Pair>, TournamentError> {
    if candidates.len() % 2 != 0 {
        return Err(TournamentError::OddCandidates(candidates.len()));
    }

    let mut shuffled = candidates.to_vec();
    shuffled.shuffle(&mut rand::thread_rng());

    let mut pairs = Vec::with_capacity(shuffled.len() / 2);
    let mut drain = shuffled.into_iter();
    while let (Some(first), Some(second)) = (drain.next(), drain.next()) {
        pairs.push(Pair { first, second });
    }
    Ok(pairs)
}

/// Chunk pairs into consecutive batches of at most `batch_size` pairs; the
/// last batch may be shorter. Pair order is preserved.
pub fn make_batches(
    pairs: Vec<Pair>,
    batch_size: usize,
) -> Result<Vec<Vec<Pair>>, TournamentError> {
    if batch_size == 0 || batch_size % 2 != 0 {
        return Err(TournamentError::OddBatchSize(batch_size));
    }

    let mut batches = Vec::new();
    let mut batch = Vec::with_capacity(batch_size);
    for pair in pairs {
        batch.push(pair);
        if batch.len() == batch_size {
            batches.push(std::mem::take(&mut batch));
        }
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("c{i}"), format!("intro {i}")))
            .collect()
    }

    #[test]
    fn test_make_pairs_covers_every_candidate_once() {
        let pool = candidates(8);
        let pairs = make_pairs(&pool).unwrap();

        assert_eq!(pairs.len(), 4);

        let mut seen: Vec<&str> = pairs
            .iter()
            .flat_map(|p| [p.first.name.as_str(), p.second.name.as_str()])
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = pool.iter().map(|c| c.name.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_make_pairs_leaves_input_untouched() {
        let pool = candidates(6);
        let before = pool.clone();
        make_pairs(&pool).unwrap();
        assert_eq!(pool, before);
    }

    #[test]
    fn test_make_pairs_rejects_odd_count() {
        let err = make_pairs(&candidates(5)).unwrap_err();
        assert!(matches!(err, TournamentError::OddCandidates(5)));
    }

    #[test]
    fn test_make_pairs_empty_pool() {
        assert!(make_pairs(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_make_batches_chunks_and_preserves_order() {
        let pairs = make_pairs(&candidates(20)).unwrap();
        let batches = make_batches(pairs.clone(), 4).unwrap();

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() <= 4));
        assert_eq!(batches[2].len(), 2);

        let rejoined: Vec<Pair> = batches.into_iter().flatten().collect();
        assert_eq!(rejoined, pairs);
    }

    #[test]
    fn test_make_batches_rejects_odd_size() {
        let pairs = make_pairs(&candidates(4)).unwrap();
        let err = make_batches(pairs, 3).unwrap_err();
        assert!(matches!(err, TournamentError::OddBatchSize(3)));
    }

    #[test]
    fn test_make_batches_rejects_zero_size() {
        let err = make_batches(Vec::new(), 0).unwrap_err();
        assert!(matches!(err, TournamentError::OddBatchSize(0)));
    }
}
