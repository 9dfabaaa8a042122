//! Transport to the Solr core: connectivity check, document upsert, and edismax queries.

pub mod types;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SolrConfig;
use crate::lang::Lang;
use types::{ApiError, Document, ScoredDocument, SearchResult, SelectResponse, UpdateResponse};

const TITLE_BOOST: &str = "2";
const PHRASE_BOOST: &str = "2";
/// Keeps the order of equally scored documents stable across field matches.
const TIE_BREAKER: &str = "0.1";
const ERROR_SNIPPET_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum SolrError {
    #[error("Solr did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Solr error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("invalid Solr response: {0}")]
    Decode(String),

    #[error("invalid Solr URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Search engine operations needed by the retrieval pipeline.
/// Implemented by `SolrClient`; tests substitute in-memory engines.
#[allow(async_fn_in_trait)]
pub trait SearchEngine {
    /// Never fails: transport problems are logged and reported as `false`.
    async fn ping(&self) -> bool;

    /// Adds or overwrites documents by id. The batch succeeds or fails as a whole.
    async fn upsert(&self, documents: &[Document]) -> Result<(), SolrError>;

    /// Runs a relevance query against the language's text field. Zero matches is `Ok` and empty.
    async fn query(&self, query: &str, lang: Lang, top_n: usize) -> Result<SearchResult, SolrError>;
}

/// HTTP client for one Solr core.
///
/// `reqwest::Client` pools connections and is safe to share, so queries and upserts
/// may run concurrently through one `SolrClient`.
#[derive(Clone, Debug)]
pub struct SolrClient {
    http: Client,
    base_url: Url,
    core: String,
    timeout: Duration,
}

impl SolrClient {
    pub fn new(http: Client, config: &SolrConfig) -> Result<Self, SolrError> {
        let base_url = Url::parse(&format!("http://{}/solr/", config.host))?;
        Ok(Self {
            http,
            base_url,
            core: config.core.clone(),
            timeout: config.timeout,
        })
    }

    fn core_url(&self, handler: &str) -> Result<Url, SolrError> {
        Ok(self.base_url.join(&format!("{}/{handler}", self.core))?)
    }

    fn select_url(&self, query: &str, lang: Lang, top_n: usize) -> Result<Url, SolrError> {
        let field = lang.text_field();
        let mut url = self.core_url("select")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("defType", "edismax")
            .append_pair("qf", &format!("title^{TITLE_BOOST} {field} url"))
            .append_pair("pf", &format!("{field}^{PHRASE_BOOST}"))
            .append_pair("tie", TIE_BREAKER)
            .append_pair("sort", "score desc")
            .append_pair("rows", &top_n.to_string())
            .append_pair("fl", &format!("id,title,url,score,{field}"))
            .append_pair("stopwords", "true")
            .append_pair("wt", "json");
        Ok(url)
    }

    fn transport_error(&self, e: reqwest::Error) -> SolrError {
        if e.is_timeout() {
            SolrError::Timeout(self.timeout)
        } else {
            SolrError::Network(e)
        }
    }

    /// The request timeout also covers the body, so a stalled body is a `Timeout`.
    /// Only bytes that arrived but don't parse are `Decode`.
    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, SolrError> {
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| SolrError::Decode(e.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, SolrError> {
        let response = request
            .header("User-Agent", crate::USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_str::<SelectResponse>(&text)
            && let Some(err) = &body.error
        {
            return Err(classify_api_error(err, status.as_u16()));
        }
        let snippet: String = text.chars().take(ERROR_SNIPPET_CHARS).collect();
        Err(SolrError::Api {
            code: status.as_u16(),
            message: format!("HTTP {status}: {snippet}"),
        })
    }

    async fn post_documents(&self, documents: &[Document]) -> Result<(), SolrError> {
        let mut url = self.core_url("update")?;
        url.query_pairs_mut()
            .append_pair("commit", "true")
            .append_pair("wt", "json");

        let response = self.send(self.http.post(url).json(documents)).await?;
        let body: UpdateResponse = self.read_json(response).await?;
        match &body.error {
            Some(err) => Err(classify_api_error(err, 500)),
            None => Ok(()),
        }
    }

    async fn select(&self, query: &str, lang: Lang, top_n: usize) -> Result<SearchResult, SolrError> {
        let url = self.select_url(query, lang, top_n)?;
        let response = self.send(self.http.get(url)).await?;
        let body: SelectResponse = self.read_json(response).await?;

        if let Some(err) = &body.error {
            return Err(classify_api_error(err, 500));
        }
        let Some(response) = body.response else {
            return Err(SolrError::Decode("missing 'response' section".to_string()));
        };

        let hits: Vec<ScoredDocument> = response.docs.into_iter().map(Into::into).collect();
        debug!(
            %lang,
            query,
            num_found = response.num_found.unwrap_or_default(),
            returned = hits.len(),
            "Solr query complete"
        );
        Ok(SearchResult { hits })
    }
}

impl SearchEngine for SolrClient {
    async fn ping(&self) -> bool {
        // The admin dashboard answers even when the core has no ping handler configured.
        match self.send(self.http.get(self.base_url.clone())).await {
            Ok(_) => {
                info!(url = %self.base_url, "connected to Solr");
                true
            }
            Err(e) => {
                warn!(url = %self.base_url, error = %e, "Solr not reachable");
                false
            }
        }
    }

    async fn upsert(&self, documents: &[Document]) -> Result<(), SolrError> {
        if documents.is_empty() {
            debug!("empty upsert batch, nothing to send");
            return Ok(());
        }
        self.post_documents(documents)
            .await
            .inspect_err(|e| warn!(core = %self.core, error = %e, "Solr upsert failed"))?;
        info!(core = %self.core, count = documents.len(), "documents indexed");
        Ok(())
    }

    async fn query(&self, query: &str, lang: Lang, top_n: usize) -> Result<SearchResult, SolrError> {
        self.select(query, lang, top_n)
            .await
            .inspect_err(|e| warn!(%lang, query, error = %e, "Solr query failed"))
    }
}

fn classify_api_error(err: &ApiError, fallback_code: u16) -> SolrError {
    SolrError::Api {
        code: err.code.unwrap_or(fallback_code),
        message: err
            .msg
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string()),
    }
}
