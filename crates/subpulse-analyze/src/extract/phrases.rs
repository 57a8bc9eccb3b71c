//! Heuristic noun-phrase and entity proposals over normalized text.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use subpulse_core::{Error, Result};

use super::stopwords::is_stopword;
use crate::scorers::{PhraseExtractor, Phrases};

/// Default corpus size limit, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 1_000_000;

/// Non-stopword tokens that never head a noun phrase. Includes the
/// apostrophe-less contractions left behind by normalization.
static FUNCTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "would", "could", "might", "must", "shall", "may", "also", "even", "still", "yet",
        "much", "many", "really", "get", "gets", "got", "getting", "go", "goes", "going",
        "went", "make", "makes", "made", "know", "think", "want", "say", "says", "said",
        "see", "use", "used", "like", "well", "though", "although", "however", "maybe",
        "im", "ive", "id", "ill", "youre", "youve", "hes", "shes", "theyre", "were", "weve",
        "thats", "theres", "whats", "dont", "doesnt", "didnt", "cant", "wont", "isnt",
        "arent", "wasnt", "werent", "havent", "hasnt", "wouldnt", "couldnt", "shouldnt",
        "lets", "yes", "yeah", "ok", "okay", "lol",
    ]
    .into_iter()
    .collect()
});

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn is_calendar_word(token: &str) -> bool {
    MONTHS.contains(&token) || WEEKDAYS.contains(&token)
}

fn is_content_word(token: &str) -> bool {
    !is_stopword(token) && !FUNCTION_WORDS.contains(token) && !is_numeric(token)
}

/// Maximal runs of content words, in text order.
pub fn noun_phrases(tokens: &[&str]) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for &token in tokens {
        if is_content_word(token) {
            run.push(token);
        } else if !run.is_empty() {
            phrases.push(run.join(" "));
            run.clear();
        }
    }
    if !run.is_empty() {
        phrases.push(run.join(" "));
    }
    phrases
}

/// Numbers and calendar expressions ("march 2024", "friday"), in text order.
pub fn entities(tokens: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let dated = i + 1 < tokens.len() && is_numeric(tokens[i + 1]);
        // "may" is far more often the modal verb than the month
        if is_calendar_word(token) && (token != "may" || dated) {
            let mut end = i + 1;
            while end < tokens.len() && is_calendar_word(tokens[end]) {
                end += 1;
            }
            if end < tokens.len() && is_numeric(tokens[end]) {
                end += 1;
            }
            found.push(tokens[i..end].join(" "));
            i = end;
        } else if is_numeric(token) {
            found.push(token.to_string());
            i += 1;
        } else {
            i += 1;
        }
    }
    found
}

/// Rule-based stand-in for a noun-chunk/NER model.
#[derive(Debug, Clone)]
pub struct HeuristicPhraseExtractor {
    max_length: usize,
}

impl Default for HeuristicPhraseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicPhraseExtractor {
    pub fn new() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl PhraseExtractor for HeuristicPhraseExtractor {
    fn extract(&self, corpus: &str) -> Result<Phrases> {
        let length = corpus.chars().count();
        if length > self.max_length {
            return Err(Error::Extraction(format!(
                "corpus of {} characters exceeds maximum of {}",
                length, self.max_length
            )));
        }

        let tokens: Vec<&str> = corpus.split_whitespace().collect();
        Ok(Phrases {
            noun_phrases: noun_phrases(&tokens),
            entities: entities(&tokens),
        })
    }
}
