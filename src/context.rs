//! Hooks for the chat layer: when to retrieve, and how retrieved context is phrased.

use crate::search::RetrievalAnswer;

pub const QUERY_COMMAND: &str = "/query";
pub const DEFAULT_INSERTION_FORMAT: &str =
    "Answer the question based only on the context below: \nContext: {data} \nQuestion: {query}";
pub const NO_DATA: &str = "No data found";
/// Messages longer than this many words trigger retrieval even without a question mark.
const LONG_MESSAGE_WORDS: usize = 8;

/// In explicit mode only `/query ...` messages retrieve. Otherwise questions
/// and long messages do.
pub fn should_run_query(message: &str, explicit: bool) -> bool {
    if explicit {
        message.starts_with(QUERY_COMMAND)
    } else {
        message.ends_with('?') || message.split(' ').count() > LONG_MESSAGE_WORDS
    }
}

pub fn strip_command(message: &str) -> &str {
    message
        .strip_prefix(QUERY_COMMAND)
        .map(str::trim_start)
        .unwrap_or(message)
}

/// Fills `{data}` and `{query}` in `template`.
pub fn format_context(answer: &RetrievalAnswer, question: &str, template: &str) -> String {
    let data = if answer.is_empty() {
        NO_DATA.to_string()
    } else {
        answer.snippets.join("\n")
    };
    template
        .replace("{data}", &data)
        .replace("{query}", question)
}
