//! Retrieval layer of a Solr-backed chat assistant.
//!
//! A question is cleaned ([`query`]), sent to Solr ([`solr`]), and the hits are
//! re-ranked and cut down to a single cited snippet ([`search`]).

pub mod config;
pub mod context;
pub mod ingest;
pub mod lang;
pub mod query;
pub mod search;
pub mod solr;

pub use lang::Lang;

pub const USER_AGENT: &str = concat!("ragcore/", env!("CARGO_PKG_VERSION"));
