//! Corpus topic ranking.

use std::collections::HashMap;
use std::sync::Arc;

use subpulse_core::{Result, Topic};
use tracing::debug;

use super::stopwords::is_stopword;
use crate::normalize::normalize;
use crate::scorers::{PhraseExtractor, Phrases};

/// Number of topics returned when the caller does not say.
pub const DEFAULT_TOP_N: usize = 10;

/// Longest noun phrase, in words, that may become a topic.
pub const MAX_PHRASE_WORDS: usize = 3;

/// Join normalized texts with single spaces.
///
/// Phrase boundaries between texts are not preserved, so a phrase can span
/// the end of one text and the start of the next.
pub fn build_corpus<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|t| normalize(Some(t.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn keep_noun_phrase(phrase: &str) -> bool {
    !is_stopword(&phrase.to_lowercase()) && phrase.split_whitespace().count() <= MAX_PHRASE_WORDS
}

pub fn keep_entity(entity: &str) -> bool {
    !is_stopword(&entity.to_lowercase())
}

/// Surviving candidates in encounter order: noun phrases, then entities.
pub fn filter_candidates(phrases: Phrases) -> Vec<String> {
    let Phrases {
        noun_phrases,
        entities,
    } = phrases;

    noun_phrases
        .into_iter()
        .filter(|p| keep_noun_phrase(p))
        .chain(entities.into_iter().filter(|e| keep_entity(e)))
        .collect()
}

/// Count exact strings and return the `top_n` most frequent.
/// Equal counts keep first-encounter order.
pub fn rank_by_frequency(candidates: Vec<String>, top_n: usize) -> Vec<Topic> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut topics: Vec<Topic> = Vec::new();

    for candidate in candidates {
        match index.get(&candidate) {
            Some(&i) => topics[i].count += 1,
            None => {
                index.insert(candidate.clone(), topics.len());
                topics.push(Topic {
                    topic: candidate,
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    topics.sort_by(|a, b| b.count.cmp(&a.count));
    topics.truncate(top_n);
    topics
}

/// Extracts the most frequent phrases across a set of texts.
#[derive(Clone)]
pub struct TopicExtractor {
    extractor: Arc<dyn PhraseExtractor>,
}

impl TopicExtractor {
    pub fn new(extractor: Arc<dyn PhraseExtractor>) -> Self {
        Self { extractor }
    }

    /// Top `top_n` topics across `texts`. Extraction failures propagate.
    pub fn extract_topics<S: AsRef<str>>(&self, texts: &[S], top_n: usize) -> Result<Vec<Topic>> {
        if texts.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let corpus = build_corpus(texts);
        let phrases = self.extractor.extract(&corpus)?;
        debug!(
            "Extracted {} noun phrases, {} entities from {} texts",
            phrases.noun_phrases.len(),
            phrases.entities.len(),
            texts.len()
        );

        Ok(rank_by_frequency(filter_candidates(phrases), top_n))
    }
}
