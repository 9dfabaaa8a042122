use tracing::{debug, info};

use super::ranker::RankingPolicy;
use crate::lang::Lang;
use crate::query::{QueryNormalizer, StopwordError};
use crate::solr::types::Document;
use crate::solr::{SearchEngine, SolrError};

pub const DEFAULT_TOP_N: usize = 10;
/// The requested language, then the default language.
pub const MAX_ATTEMPTS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error(transparent)]
    ResourceUnavailable(#[from] StopwordError),

    #[error("search unavailable: {0}")]
    SearchUnavailable(#[source] SolrError),

    #[error("index unavailable: {0}")]
    IndexUnavailable(#[source] SolrError),
}

/// Context for the conversation: snippets and the parallel list of their sources.
/// Empty means nothing relevant was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalAnswer {
    pub snippets: Vec<String>,
    pub sources: Vec<String>,
}

impl RetrievalAnswer {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Languages to try for a request, in order. Never more than `MAX_ATTEMPTS`.
pub fn attempt_languages(lang: Lang) -> Vec<Lang> {
    if lang.is_default() {
        vec![lang]
    } else {
        vec![lang, Lang::default()]
    }
}

pub struct RetrievalService<E> {
    engine: E,
    normalizer: QueryNormalizer,
    policy: RankingPolicy,
}

impl<E: SearchEngine> RetrievalService<E> {
    pub fn new(engine: E, normalizer: QueryNormalizer, policy: RankingPolicy) -> Self {
        Self {
            engine,
            normalizer,
            policy,
        }
    }

    #[cfg(test)]
    fn engine(&self) -> &E {
        &self.engine
    }

    /// Finds context for `question`.
    ///
    /// `language` is coerced to a supported language. When it yields nothing and is
    /// not the default, the whole lookup is repeated once in the default language.
    /// Engine failures are returned as errors and are never retried.
    pub async fn search(
        &self,
        question: &str,
        language: &str,
        top_n: usize,
    ) -> Result<RetrievalAnswer, RetrievalError> {
        let top_n = top_n.max(1);
        let requested = Lang::coerce(language);

        for lang in attempt_languages(requested) {
            let normalized = self.normalizer.normalize(question, lang)?;
            if normalized.is_empty() {
                debug!(%lang, "nothing left after normalization, skipping query");
                continue;
            }

            let result = self
                .engine
                .query(&normalized, lang, top_n)
                .await
                .map_err(RetrievalError::SearchUnavailable)?;
            if result.is_empty() {
                debug!(%lang, query = %normalized, "no hits");
                continue;
            }

            if let Some(candidate) = self.policy.rank(&result, &normalized, lang) {
                info!(%lang, query = %normalized, source = candidate.document.source(), "context found");
                return Ok(RetrievalAnswer {
                    snippets: vec![self.policy.snippet(&candidate, lang)],
                    sources: vec![candidate.document.source().to_string()],
                });
            }
            debug!(%lang, query = %normalized, "no relevant document");
        }

        info!(requested = %requested, "no context found");
        Ok(RetrievalAnswer::default())
    }

    pub async fn index(&self, documents: &[Document]) -> Result<(), RetrievalError> {
        self.engine
            .upsert(documents)
            .await
            .map_err(RetrievalError::IndexUnavailable)
    }

    pub async fn is_available(&self) -> bool {
        self.engine.ping().await
    }
}
