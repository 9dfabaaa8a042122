use std::fmt;

use tracing::debug;

/// Languages with a dedicated text field in the index and a stopword list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lang {
    #[default]
    En,
    De,
    Hu,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::En, Lang::De, Lang::Hu];

    /// Maps a language code to a supported language. Unknown codes fall back to the default.
    pub fn coerce(code: &str) -> Lang {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
            .unwrap_or_else(|| {
                debug!(code, fallback = %Lang::default(), "unsupported language code");
                Lang::default()
            })
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::De => "de",
            Lang::Hu => "hu",
        }
    }

    pub fn text_field(self) -> &'static str {
        match self {
            Lang::En => "text_en",
            Lang::De => "text_de",
            Lang::Hu => "text_hu",
        }
    }

    pub fn from_text_field(field: &str) -> Option<Lang> {
        Self::ALL.into_iter().find(|lang| lang.text_field() == field)
    }

    pub fn is_default(self) -> bool {
        self == Lang::default()
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_codes_are_kept() {
        assert_eq!(Lang::coerce("de"), Lang::De);
        assert_eq!(Lang::coerce("hu"), Lang::Hu);
        assert_eq!(Lang::coerce("en"), Lang::En);
    }

    #[test]
    fn coerce_ignores_case_and_whitespace() {
        assert_eq!(Lang::coerce(" DE "), Lang::De);
    }

    #[test]
    fn unsupported_code_falls_back_to_english() {
        assert_eq!(Lang::coerce("fr"), Lang::En);
        assert_eq!(Lang::coerce(""), Lang::En);
    }

    #[test]
    fn text_field_round_trips() {
        for lang in Lang::ALL {
            assert_eq!(Lang::from_text_field(lang.text_field()), Some(lang));
        }
        assert_eq!(Lang::from_text_field("text_fr"), None);
        assert_eq!(Lang::from_text_field("title"), None);
    }

    #[test]
    fn only_english_is_default() {
        assert!(Lang::En.is_default());
        assert!(!Lang::Hu.is_default());
    }
}
