//! SubPulse Analyze: sentiment scoring, post weighting, topic extraction, batch aggregation.

pub mod analyzer;
pub mod extract;
pub mod lexicon;
pub mod normalize;
pub mod scorers;
pub mod sentiment;

pub use analyzer::{overall_sentiment, Analyzer};
pub use extract::{is_stopword, HeuristicPhraseExtractor, TopicExtractor, DEFAULT_TOP_N};
pub use lexicon::LexiconScorer;
pub use normalize::normalize;
pub use scorers::{PhraseExtractor, Phrases, PolarityScorer, TextScorers};
pub use sentiment::{weighted_compound, SentimentScorer, BODY_WEIGHT, TITLE_WEIGHT};
