//! Turns a folder of extracted documents into index records.
//!
//! Each file holds the title on its first line and the body text after it. URLs come
//! from a `{ "file name": "url" }` JSON map written by the download step.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::lang::Lang;
use crate::solr::types::Document;

/// Bookkeeping files that live next to the documents but are not documents.
const SKIPPED_FILES: [&str; 2] = ["urls.txt", "urls.json"];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{} doesn't exist", .0.display())]
    MissingFolder(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid URL map {}: {source}", .path.display())]
    UrlMap {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_url_map(path: &Path) -> Result<HashMap<String, String>, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IngestError::UrlMap {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_folder(
    folder: &Path,
    urls: &HashMap<String, String>,
    lang: Lang,
) -> Result<Vec<Document>, IngestError> {
    if !folder.is_dir() {
        return Err(IngestError::MissingFolder(folder.to_path_buf()));
    }
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| IngestError::Io { path, source }
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_err(folder))? {
        let entry = entry.map_err(io_err(folder))?;
        if entry.file_type().map_err(io_err(&entry.path()))?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if SKIPPED_FILES.contains(&name) {
            continue;
        }
        let content = fs::read_to_string(&path).map_err(io_err(&path))?;
        documents.push(parse_document(name, &content, resolve_url(name, urls), lang));
    }

    info!(folder = %folder.display(), count = documents.len(), %lang, "documents loaded");
    Ok(documents)
}

fn parse_document(id: &str, content: &str, url: String, lang: Lang) -> Document {
    let mut lines = content.lines();
    let title = lines.next().unwrap_or_default();
    let text = lines.collect::<Vec<_>>().join("\n");
    Document::new(id, title, url).with_text(lang, text)
}

/// Direct lookup by file name. Split PDFs (`Manual_2.txt`) fall back to the
/// source PDF's entry (`manual.pdf`). Unknown files get an empty URL.
fn resolve_url(name: &str, urls: &HashMap<String, String>) -> String {
    if let Some(url) = urls.get(name) {
        return url.clone();
    }
    let mut parts: Vec<&str> = name.split('_').collect();
    parts.pop();
    let source_pdf = format!("{}.pdf", parts.join("_").to_lowercase());
    urls.get(&source_pdf).cloned().unwrap_or_default()
}
