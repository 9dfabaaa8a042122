use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::{fs, io};

use tracing::debug;

use crate::lang::Lang;

#[derive(Debug, thiserror::Error)]
pub enum StopwordError {
    #[error("stopword list for '{lang}' unavailable at {}: {source}", .path.display())]
    Unavailable {
        lang: Lang,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-language stopword lists loaded lazily from `{dir}/stopwords_{code}.txt`.
///
/// Lists are cached for the lifetime of the store. Two callers racing on the same
/// uncached language both read the file; the first insert wins and both see identical sets.
#[derive(Debug)]
pub struct StopwordStore {
    dir: PathBuf,
    cache: RwLock<HashMap<Lang, Arc<HashSet<String>>>>,
}

impl StopwordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, lang: Lang) -> PathBuf {
        self.dir.join(format!("stopwords_{}.txt", lang.code()))
    }

    pub fn load(&self, lang: Lang) -> Result<Arc<HashSet<String>>, StopwordError> {
        if let Some(words) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang)
        {
            return Ok(Arc::clone(words));
        }

        let path = self.path_for(lang);
        let words = Arc::new(read_list(&path).map_err(|source| StopwordError::Unavailable {
            lang,
            path: path.clone(),
            source,
        })?);
        debug!(%lang, path = %path.display(), count = words.len(), "stopwords loaded");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(lang).or_insert(words)))
    }
}

fn read_list(path: &Path) -> io::Result<HashSet<String>> {
    Ok(parse_list(&fs::read_to_string(path)?))
}

/// Accepts plain lists and the Snowball format (`word | comment`, `#` comment lines).
fn parse_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.split('|').next())
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
