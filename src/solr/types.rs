use std::collections::{BTreeMap, HashMap};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::lang::Lang;

/// A unit of the index. Serialized flat as `{id, title, text_<lang>..., url}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub texts: BTreeMap<Lang, String>,
    pub url: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            texts: BTreeMap::new(),
            url: url.into(),
        }
    }

    pub fn with_text(mut self, lang: Lang, text: impl Into<String>) -> Self {
        self.texts.insert(lang, text.into());
        self
    }

    pub fn text(&self, lang: Lang) -> Option<&str> {
        self.texts.get(&lang).map(String::as_str)
    }

    /// URL when known, otherwise the document id.
    pub fn source(&self) -> &str {
        if self.url.is_empty() {
            &self.id
        } else {
            &self.url
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.texts.len()))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("title", &self.title)?;
        for (lang, text) in &self.texts {
            map.serialize_entry(lang.text_field(), text)?;
        }
        map.serialize_entry("url", &self.url)?;
        map.end()
    }
}

/// One hit as returned by the engine, in the engine's order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub hits: Vec<ScoredDocument>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    pub response: Option<ResponseBody>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub num_found: Option<u64>,
    #[serde(default)]
    pub docs: Vec<RawDoc>,
}

/// Solr may return a field as a single value or, for multi-valued fields, as an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::One(s) => s,
            FieldValue::Many(v) => v.join("\n"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawDoc {
    pub id: String,
    pub title: Option<FieldValue>,
    pub url: Option<FieldValue>,
    #[serde(default)]
    pub score: f64,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

/// Keeps the `text_<lang>` fields of supported languages; everything else is dropped.
fn text_fields(fields: HashMap<String, serde_json::Value>) -> BTreeMap<Lang, String> {
    fields
        .into_iter()
        .filter_map(|(field, value)| {
            let lang = Lang::from_text_field(&field)?;
            let text = serde_json::from_value::<FieldValue>(value).ok()?.into_text();
            Some((lang, text))
        })
        .collect()
}

impl From<RawDoc> for ScoredDocument {
    fn from(raw: RawDoc) -> Self {
        ScoredDocument {
            document: Document {
                id: raw.id,
                title: raw.title.map(FieldValue::into_text).unwrap_or_default(),
                texts: text_fields(raw.fields),
                url: raw.url.map(FieldValue::into_text).unwrap_or_default(),
            },
            score: raw.score,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub error: Option<ApiError>,
}
