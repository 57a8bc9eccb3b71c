//! Text scoring collaborators consumed by the pipeline.
//!
//! The pipeline never reaches for global models: a `TextScorers` bundle is
//! built once at startup and injected, so tests can swap in stubs.

use std::sync::Arc;

use subpulse_core::{PolarityScore, Result, SubPulseConfig};
use subpulse_infer::SentimentClassifier;
use tracing::info;

use crate::extract::HeuristicPhraseExtractor;
use crate::lexicon::LexiconScorer;

/// Produces polarity scores for a non-empty text.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<PolarityScore>;
}

/// Candidate phrases found in a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phrases {
    pub noun_phrases: Vec<String>,
    pub entities: Vec<String>,
}

/// Extracts noun phrases and named entities from a corpus.
pub trait PhraseExtractor: Send + Sync {
    fn extract(&self, corpus: &str) -> Result<Phrases>;
}

/// The scoring backends used by one analyzer.
#[derive(Clone)]
pub struct TextScorers {
    pub polarity: Arc<dyn PolarityScorer>,
    pub phrases: Arc<dyn PhraseExtractor>,
    pub classifier: Option<Arc<dyn SentimentClassifier>>,
}

impl TextScorers {
    pub fn new(polarity: Arc<dyn PolarityScorer>, phrases: Arc<dyn PhraseExtractor>) -> Self {
        Self {
            polarity,
            phrases,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Option<Arc<dyn SentimentClassifier>>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Built-in lexicon scorer and heuristic phrase extractor, no classifier.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(LexiconScorer::new()),
            Arc::new(HeuristicPhraseExtractor::new()),
        )
    }

    /// Resolve every backend from configuration.
    ///
    /// A configured lexicon file that cannot be read is an error; a classifier
    /// that cannot be loaded is not (scores degrade to lexicon only).
    pub fn from_config(config: &SubPulseConfig) -> Result<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                let scorer = LexiconScorer::from_vader_file(path)?;
                info!(
                    "Loaded sentiment lexicon from {} ({} entries)",
                    path.display(),
                    scorer.len()
                );
                scorer
            }
            None => LexiconScorer::new(),
        };

        let classifier = if config.use_classifier {
            subpulse_infer::create_classifier(&config.model_dir)
        } else {
            None
        };

        Ok(Self::new(Arc::new(lexicon), Arc::new(HeuristicPhraseExtractor::new()))
            .with_classifier(classifier))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use subpulse_core::Error;

    #[test]
    fn test_from_config_defaults() {
        let scorers = TextScorers::from_config(&SubPulseConfig::default()).unwrap();
        assert!(scorers.classifier.is_none());
        assert!(scorers.polarity.polarity("what a great day").unwrap().compound > 0.0);
    }

    #[test]
    fn test_from_config_missing_lexicon() {
        let config = SubPulseConfig {
            lexicon_path: Some("/nonexistent/vader_lexicon.txt".into()),
            ..Default::default()
        };
        assert!(matches!(TextScorers::from_config(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_custom_lexicon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "meh\t-1.5\t0.5\t[-1, -2]").unwrap();
        let config = SubPulseConfig {
            lexicon_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let scorers = TextScorers::from_config(&config).unwrap();
        assert!(scorers.polarity.polarity("meh").unwrap().compound < 0.0);
        assert_eq!(scorers.polarity.polarity("great").unwrap().compound, 0.0);
    }

    #[test]
    fn test_stub_keeps_recording_after_holder_panics() {
        let stub = Arc::new(stubs::CannedPhrases::new(&["x"], &[]));
        let held = Arc::clone(&stub);
        let _ = std::thread::spawn(move || {
            let _guard = held.corpora.lock();
            panic!("holder panicked");
        })
        .join();

        stub.extract("after").unwrap();
        assert_eq!(stub.corpora(), vec!["after".to_string()]);
    }
}
