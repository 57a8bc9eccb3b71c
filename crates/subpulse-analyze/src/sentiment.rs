//! Per-item sentiment scoring and the title/body post weighting.

use std::sync::Arc;

use subpulse_core::{
    AnnotatedComment, AnnotatedPost, Comment, PolarityScore, Post, PostSentiment, Result,
};
use subpulse_infer::{truncate_chars, SentimentClassifier};
use tracing::warn;

use crate::scorers::{PolarityScorer, TextScorers};

/// Share of a post's compound taken from its title.
pub const TITLE_WEIGHT: f64 = 0.7;

/// Share of a post's compound taken from its body.
pub const BODY_WEIGHT: f64 = 0.3;

pub fn weighted_compound(title: f64, body: f64) -> f64 {
    TITLE_WEIGHT * title + BODY_WEIGHT * body
}

/// Scores single texts, posts and comments.
#[derive(Clone)]
pub struct SentimentScorer {
    polarity: Arc<dyn PolarityScorer>,
    classifier: Option<Arc<dyn SentimentClassifier>>,
}

impl SentimentScorer {
    pub fn new(
        polarity: Arc<dyn PolarityScorer>,
        classifier: Option<Arc<dyn SentimentClassifier>>,
    ) -> Self {
        Self {
            polarity,
            classifier,
        }
    }

    pub fn from_scorers(scorers: &TextScorers) -> Self {
        Self::new(scorers.polarity.clone(), scorers.classifier.clone())
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Polarity of one text.
    ///
    /// Blank text scores zero without consulting any backend. A classifier
    /// failure is logged and the lexicon score is returned without its label.
    pub fn score(&self, text: &str) -> Result<PolarityScore> {
        if text.trim().is_empty() {
            return Ok(PolarityScore::zero());
        }

        let mut score = self.polarity.polarity(text)?;
        score.compound = score.compound.clamp(-1.0, 1.0);

        if let Some(classifier) = &self.classifier {
            let input = truncate_chars(text, classifier.max_input_chars());
            match classifier.classify(input) {
                Ok(result) => {
                    score.label = Some(result.label);
                    score.confidence = Some(result.score);
                }
                Err(e) => {
                    warn!("Classifier {} failed, keeping lexicon score: {}", classifier.name(), e);
                }
            }
        }

        Ok(score)
    }

    pub fn score_post(&self, post: &Post) -> Result<AnnotatedPost> {
        let title = self.score(&post.title)?;
        let content = self.score(&post.text)?;
        let compound = weighted_compound(title.compound, content.compound);

        Ok(AnnotatedPost::new(
            post.clone(),
            PostSentiment {
                title,
                content,
                compound,
            },
        ))
    }

    pub fn score_comment(&self, comment: &Comment) -> Result<AnnotatedComment> {
        let sentiment = self.score(&comment.text)?;
        Ok(AnnotatedComment::new(comment.clone(), sentiment))
    }
}
