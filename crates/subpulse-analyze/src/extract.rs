//! Topic extraction: phrase candidates, stopword filtering, frequency ranking.
//!
//! The built-in `HeuristicPhraseExtractor` stands in for a statistical
//! chunker/NER model: it works on normalized (lowercase, punctuation-free)
//! text and proposes content-word runs as noun phrases and numbers/calendar
//! expressions as entities.

pub mod phrases;
pub mod stopwords;
pub mod topics;

pub use phrases::HeuristicPhraseExtractor;
pub use stopwords::is_stopword;
pub use topics::{TopicExtractor, DEFAULT_TOP_N, MAX_PHRASE_WORDS};
