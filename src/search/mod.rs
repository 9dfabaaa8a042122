//! Retrieval: re-ranking engine hits and orchestrating the language fallback.

pub mod ranker;
pub mod service;

pub use ranker::{RankedCandidate, RankingPolicy};
pub use service::{DEFAULT_TOP_N, RetrievalAnswer, RetrievalError, RetrievalService};
