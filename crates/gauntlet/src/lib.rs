//! Single-elimination tournament over candidate records, judged by an LLM
//! oracle.
//!
//! The driver shuffles the pool into random pairs, groups pairs into
//! batches, and asks the oracle to pick a winner per pair with one prompt
//! per batch. Winners advance until one candidate remains; every round is
//! recorded in an append-only elimination tree.
//!
//! The oracle is abstracted behind the [`oracle::Oracle`] trait so its
//! semi-structured text replies never leak past the batch judge, and tests
//! can run the whole tournament against deterministic stubs.

pub mod bracket;
pub mod error;
pub mod judge;
pub mod oracle;
pub mod server;
pub mod store;
pub mod tournament;
pub mod types;

pub use error::TournamentError;
pub use judge::FallbackPolicy;
pub use oracle::{CerebrasOracle, Oracle, OracleConfig, OracleError, Verdict};
pub use store::StoreError;
pub use tournament::{run_tournament, TournamentConfig};
pub use types::{Candidate, MatchRecord, Pair, RoundRecord, TournamentResult};
