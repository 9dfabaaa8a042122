use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CORE: &str = "ragcore";
pub const DEFAULT_STOPWORDS_DIR: &str = "lang";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set (expected host[:port] of the Solr server, e.g. localhost:8983)")]
    Missing(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolrConfig {
    /// `host[:port]`, without scheme or path.
    pub host: String,
    pub core: String,
    pub timeout: Duration,
}

/// Runtime configuration, read from the environment:
/// - `SOLR_SERVER` (required), `CORE_NAME`, `SOLR_TIMEOUT_SECS`
/// - `MIN_SCORE_WEIGHT`: scales the per-query relevance threshold
/// - `STOPWORDS_DIR`: directory holding `stopwords_<lang>.txt`
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub solr: SolrConfig,
    pub stopwords_dir: PathBuf,
    pub min_score_weight: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like `from_env`, but resolves variables through `lookup` (CLI overrides, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("SOLR_SERVER").ok_or(ConfigError::Missing("SOLR_SERVER"))?;
        let core = get("CORE_NAME").unwrap_or_else(|| DEFAULT_CORE.to_string());
        let timeout_secs = parse_var(get("SOLR_TIMEOUT_SECS"), "SOLR_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let min_score_weight = parse_var(get("MIN_SCORE_WEIGHT"), "MIN_SCORE_WEIGHT", 1.0_f64)?;
        if !min_score_weight.is_finite() || min_score_weight < 0.0 {
            return Err(ConfigError::Invalid {
                var: "MIN_SCORE_WEIGHT",
                value: min_score_weight.to_string(),
            });
        }
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SOLR_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            solr: SolrConfig {
                host,
                core,
                timeout: Duration::from_secs(timeout_secs),
            },
            stopwords_dir: get("STOPWORDS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STOPWORDS_DIR)),
            min_score_weight,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { var, value: v }),
    }
}
