//! Query cleaning: stopword lists and punctuation/stopword stripping.

mod normalize;
mod stopwords;

pub use normalize::{QueryNormalizer, normalize_query, strip_punctuation};
pub use stopwords::{StopwordError, StopwordStore};
