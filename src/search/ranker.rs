use tracing::debug;

use crate::lang::Lang;
use crate::query::strip_punctuation;
use crate::solr::types::{Document, SearchResult};

/// Tunable constants of the re-ranking pass.
///
/// The engine score threshold is `tokens × per_token_weight × min_score_weight`.
/// Survivors are seeded with `seed_base − seed_decay × rank` so the engine's order
/// dominates, and lexical overlap with the query only breaks near-ties.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingPolicy {
    pub per_token_weight: f64,
    pub min_score_weight: f64,
    pub seed_base: i64,
    pub seed_decay: i64,
    pub max_chars: usize,
    /// A sentence cut is only taken when the last period sits at least this far in.
    pub min_sentence_chars: usize,
    pub ellipsis: String,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            per_token_weight: 0.1,
            min_score_weight: 1.0,
            seed_base: 500,
            seed_decay: 50,
            max_chars: 500,
            min_sentence_chars: 100,
            ellipsis: "...".to_string(),
        }
    }
}

/// The document picked for the answer, with the scores that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub document: Document,
    pub engine_score: f64,
    /// Query tokens matched in the document text.
    pub lexical_score: usize,
    /// Rank seed plus `lexical_score`.
    pub combined_score: i64,
}

impl RankingPolicy {
    pub fn with_min_score_weight(mut self, weight: f64) -> Self {
        self.min_score_weight = weight;
        self
    }

    pub fn threshold(&self, normalized_query: &str) -> f64 {
        let tokens = normalized_query.split_whitespace().count();
        tokens as f64 * self.per_token_weight * self.min_score_weight
    }

    /// Seed for a document at 1-based `rank` in the engine's order.
    pub fn seed(&self, rank: usize) -> i64 {
        self.seed_base - self.seed_decay * rank as i64
    }

    /// Picks the best hit for `lang`, or `None` if nothing clears the threshold.
    ///
    /// Hits lacking the language's text field are skipped. Ties keep the engine's order.
    pub fn rank(
        &self,
        result: &SearchResult,
        normalized_query: &str,
        lang: Lang,
    ) -> Option<RankedCandidate> {
        let threshold = self.threshold(normalized_query);
        let mut best: Option<RankedCandidate> = None;

        for (index, hit) in result.hits.iter().enumerate() {
            // Written this way so NaN scores are dropped too.
            if !(hit.score > threshold) {
                continue;
            }
            let Some(text) = hit.document.text(lang) else {
                debug!(id = %hit.document.id, field = lang.text_field(), "hit without text field skipped");
                continue;
            };

            let lexical = lexical_score(text, normalized_query);
            let combined = self.seed(index + 1) + lexical as i64;
            if best.as_ref().is_none_or(|b| combined > b.combined_score) {
                best = Some(RankedCandidate {
                    document: hit.document.clone(),
                    engine_score: hit.score,
                    lexical_score: lexical,
                    combined_score: combined,
                });
            }
        }

        match &best {
            Some(c) => debug!(
                id = %c.document.id,
                engine_score = c.engine_score,
                lexical = c.lexical_score,
                threshold,
                "candidate selected"
            ),
            None => debug!(threshold, hits = result.hits.len(), "no hit above threshold"),
        }
        best
    }

    /// Caps `text` at `max_chars` characters, preferring to end on a sentence.
    pub fn truncate(&self, text: &str) -> String {
        let Some((cut, _)) = text.char_indices().nth(self.max_chars) else {
            return text.to_string();
        };
        let mut limited = &text[..cut];
        if let Some(period) = limited.rfind('.')
            && limited[..period].chars().count() >= self.min_sentence_chars
        {
            limited = &limited[..=period];
        }
        format!("{limited}{}", self.ellipsis)
    }

    /// `title\ntext` with the text truncated.
    pub fn snippet(&self, candidate: &RankedCandidate, lang: Lang) -> String {
        let text = candidate.document.text(lang).unwrap_or_default();
        format!("{}\n{}", candidate.document.title, self.truncate(text))
    }
}

/// One point per token of `text` (punctuation stripped, lowercased) that occurs
/// as a substring of the normalized query. Repeated tokens score repeatedly.
pub fn lexical_score(text: &str, normalized_query: &str) -> usize {
    strip_punctuation(text)
        .split_whitespace()
        .filter(|token| normalized_query.contains(token))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solr::types::ScoredDocument;

    fn hit(id: &str, score: f64, text: &str) -> ScoredDocument {
        ScoredDocument {
            document: Document::new(id, format!("title {id}"), "").with_text(Lang::En, text),
            score,
        }
    }

    fn result(hits: Vec<ScoredDocument>) -> SearchResult {
        SearchResult { hits }
    }

    #[test]
    fn threshold_scales_with_token_count() {
        let policy = RankingPolicy::default();
        assert_eq!(policy.threshold(""), 0.0);
        assert!((policy.threshold("solar panels work") - 0.3).abs() < 1e-9);

        let strict = RankingPolicy::default().with_min_score_weight(2.0);
        assert!((strict.threshold("solar panels") - 0.4).abs() < 1e-9);
    }

    #[test]
    fn seed_decays_by_rank() {
        let policy = RankingPolicy::default();
        assert_eq!(policy.seed(1), 450);
        assert_eq!(policy.seed(2), 400);
    }

    #[test]
    fn lexical_score_counts_substring_matches() {
        assert_eq!(lexical_score("Solar panels, solar power!", "solar panels work"), 3);
        assert_eq!(lexical_score("Wind turbines", "solar panels"), 0);
        // "pan" is a substring of "panels"
        assert_eq!(lexical_score("pan", "solar panels"), 1);
    }

    #[test]
    fn hits_at_or_below_threshold_are_dropped() {
        let policy = RankingPolicy::default();
        // threshold for two tokens is 0.2
        let r = result(vec![hit("a", 0.2, "solar"), hit("b", 0.1, "panels")]);
        assert!(policy.rank(&r, "solar panels", Lang::En).is_none());
    }

    #[test]
    fn nan_scores_are_dropped() {
        let policy = RankingPolicy::default();
        let r = result(vec![hit("a", f64::NAN, "solar")]);
        assert!(policy.rank(&r, "solar", Lang::En).is_none());
    }

    #[test]
    fn selected_candidate_beats_threshold() {
        let policy = RankingPolicy::default();
        let r = result(vec![
            hit("a", 0.05, "solar panels"),
            hit("b", 0.9, "nothing relevant"),
        ]);
        let best = policy.rank(&r, "solar panels", Lang::En).unwrap();
        assert_eq!(best.document.id, "b");
        assert!(best.engine_score > policy.threshold("solar panels"));
    }

    #[test]
    fn engine_order_dominates_lexical_overlap() {
        let policy = RankingPolicy::default();
        let r = result(vec![
            hit("first", 5.0, "unrelated words"),
            hit("second", 4.0, "solar solar solar panels panels"),
        ]);
        let best = policy.rank(&r, "solar panels", Lang::En).unwrap();
        assert_eq!(best.document.id, "first");
        assert_eq!(best.combined_score, 450);
    }

    #[test]
    fn lexical_overlap_promotes_underscored_document() {
        let policy = RankingPolicy {
            seed_decay: 1,
            ..RankingPolicy::default()
        };
        let r = result(vec![
            hit("first", 5.0, "unrelated words"),
            hit("second", 4.0, "solar panels"),
        ]);
        let best = policy.rank(&r, "solar panels", Lang::En).unwrap();
        assert_eq!(best.document.id, "second");
        assert_eq!(best.lexical_score, 2);
    }

    #[test]
    fn ties_keep_engine_order() {
        let policy = RankingPolicy {
            seed_decay: 0,
            ..RankingPolicy::default()
        };
        let r = result(vec![hit("a", 2.0, "solar"), hit("b", 2.0, "solar")]);
        assert_eq!(policy.rank(&r, "solar", Lang::En).unwrap().document.id, "a");
    }

    #[test]
    fn hits_without_language_field_are_skipped() {
        let policy = RankingPolicy::default();
        let german = ScoredDocument {
            document: Document::new("de", "t", "").with_text(Lang::De, "Solar"),
            score: 9.0,
        };
        let r = result(vec![german, hit("en", 1.0, "solar")]);
        assert_eq!(policy.rank(&r, "solar", Lang::En).unwrap().document.id, "en");

        let only_german = result(vec![r.hits[0].clone()]);
        assert!(policy.rank(&only_german, "solar", Lang::En).is_none());
    }

    #[test]
    fn empty_result_has_no_candidate() {
        assert!(RankingPolicy::default()
            .rank(&SearchResult::default(), "solar", Lang::En)
            .is_none());
    }

    #[test]
    fn short_text_is_untouched() {
        let policy = RankingPolicy::default();
        let text = "Solar panels convert sunlight into electricity efficiently.";
        assert_eq!(policy.truncate(text), text);
        assert_eq!(policy.truncate(&"x".repeat(500)), "x".repeat(500));
    }

    #[test]
    fn long_text_cuts_at_last_sentence() {
        let policy = RankingPolicy::default();
        let text = format!("{}. {}", "a".repeat(200), "b".repeat(400));
        let out = policy.truncate(&text);
        assert_eq!(out, format!("{}....", "a".repeat(200)));
    }

    #[test]
    fn early_period_is_ignored() {
        let policy = RankingPolicy::default();
        let text = format!("Intro. {}", "c".repeat(600));
        let out = policy.truncate(&text);
        assert_eq!(out.chars().count(), 503);
        assert!(out.ends_with("ccc..."));
    }

    #[test]
    fn truncation_bounds_hold() {
        let policy = RankingPolicy::default();
        let samples = [
            "z".repeat(1000),
            format!("{}.{}", "y".repeat(100), "y".repeat(700)),
            format!("{}.{}.{}", "w".repeat(150), "w".repeat(300), "w".repeat(300)),
            "é".repeat(800),
        ];
        for text in &samples {
            let out = policy.truncate(text);
            assert!(out.chars().count() <= 503, "too long: {}", out.chars().count());
            assert!(out.ends_with("..."));

            let head: String = text.chars().take(500).collect();
            if let Some(p) = head.chars().skip(100).position(|c| c == '.') {
                let last = head.rfind('.').unwrap();
                let last_chars = head[..last].chars().count();
                assert!(p + 100 <= last_chars);
                assert!(out.chars().count() <= last_chars + 1 + 3);
            }
        }
    }

    #[test]
    fn truncate_respects_multibyte_boundaries() {
        let policy = RankingPolicy::default();
        let out = policy.truncate(&"ő".repeat(600));
        assert_eq!(out, format!("{}...", "ő".repeat(500)));
    }

    #[test]
    fn snippet_joins_title_and_text() {
        let policy = RankingPolicy::default();
        let r = result(vec![hit("a", 1.0, "Body text.")]);
        let best = policy.rank(&r, "body", Lang::En).unwrap();
        assert_eq!(policy.snippet(&best, Lang::En), "title a\nBody text.");
    }
}
