//! Batch aggregation: annotate items, rank topics, summarize sentiment.

use subpulse_core::{
    AnnotatedComment, AnnotatedPost, BatchResult, Comment, OverallSentiment, Post, Result,
    Scored, SentimentCategory, Topic,
};
use tracing::{debug, info};

use crate::extract::{TopicExtractor, DEFAULT_TOP_N};
use crate::scorers::TextScorers;
use crate::sentiment::SentimentScorer;

/// Mean compound and category fractions over annotated items.
pub fn overall_sentiment<T: Scored>(items: &[T]) -> OverallSentiment {
    if items.is_empty() {
        return OverallSentiment::default();
    }

    let total = items.len() as f64;
    let mut sum = 0.0;
    let (mut positive, mut neutral, mut negative) = (0usize, 0usize, 0usize);

    for item in items {
        sum += item.compound();
        match item.category() {
            SentimentCategory::Positive => positive += 1,
            SentimentCategory::Neutral => neutral += 1,
            SentimentCategory::Negative => negative += 1,
        }
    }

    OverallSentiment {
        compound: sum / total,
        positive: positive as f64 / total,
        neutral: neutral as f64 / total,
        negative: negative as f64 / total,
    }
}

/// The sentiment and topic pipeline for batches of posts or comments.
#[derive(Clone)]
pub struct Analyzer {
    scorer: SentimentScorer,
    topics: TopicExtractor,
    top_n: usize,
}

impl Analyzer {
    pub fn new(scorers: TextScorers) -> Self {
        Self {
            scorer: SentimentScorer::from_scorers(&scorers),
            topics: TopicExtractor::new(scorers.phrases),
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Number of topics attached to each batch.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn has_classifier(&self) -> bool {
        self.scorer.has_classifier()
    }

    pub fn extract_topics<S: AsRef<str>>(&self, texts: &[S], top_n: usize) -> Result<Vec<Topic>> {
        self.topics.extract_topics(texts, top_n)
    }

    /// Annotate posts in order and rank topics over titles, then bodies.
    pub fn analyze_posts(&self, posts: &[Post]) -> Result<BatchResult<AnnotatedPost>> {
        if posts.is_empty() {
            return Ok(BatchResult::empty());
        }

        let items = posts
            .iter()
            .map(|p| self.scorer.score_post(p))
            .collect::<Result<Vec<_>>>()?;

        let corpus: Vec<&str> = posts
            .iter()
            .map(|p| p.title.as_str())
            .chain(posts.iter().map(|p| p.text.as_str()))
            .collect();
        let topics = self.topics.extract_topics(&corpus, self.top_n)?;
        let overall_sentiment = overall_sentiment(&items);

        info!(
            "Analyzed {} posts: compound={:.3}, {} topics",
            items.len(),
            overall_sentiment.compound,
            topics.len()
        );

        Ok(BatchResult {
            items,
            topics,
            overall_sentiment,
        })
    }

    /// Annotate comments in order; topics only when `with_topics` is set.
    pub fn analyze_comments(
        &self,
        comments: &[Comment],
        with_topics: bool,
    ) -> Result<BatchResult<AnnotatedComment>> {
        if comments.is_empty() {
            return Ok(BatchResult::empty());
        }

        let items = comments
            .iter()
            .map(|c| self.scorer.score_comment(c))
            .collect::<Result<Vec<_>>>()?;

        let topics = if with_topics {
            let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
            self.topics.extract_topics(&texts, self.top_n)?
        } else {
            debug!("Skipping topic extraction for {} comments", comments.len());
            Vec::new()
        };
        let overall_sentiment = overall_sentiment(&items);

        info!(
            "Analyzed {} comments: compound={:.3}, {} topics",
            items.len(),
            overall_sentiment.compound,
            topics.len()
        );

        Ok(BatchResult {
            items,
            topics,
            overall_sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scorers::stubs::{CannedPhrases, FixedPolarity};
    use subpulse_core::Error;

    fn post(id: &str, title: &str, text: &str) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    fn comment(id: &str, text: &str) -> Comment {
        Comment {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    fn analyzer(
        pairs: &[(&str, f64)],
        phrases: CannedPhrases,
    ) -> (Analyzer, Arc<FixedPolarity>, Arc<CannedPhrases>) {
        let polarity = Arc::new(FixedPolarity::new(pairs));
        let phrases = Arc::new(phrases);
        let analyzer = Analyzer::new(TextScorers::new(polarity.clone(), phrases.clone()));
        (analyzer, polarity, phrases)
    }

    #[test]
    fn test_empty_batch_short_circuits() {
        let (analyzer, polarity, phrases) = analyzer(&[], CannedPhrases::new(&["x"], &[]));
        let result = analyzer.analyze_posts(&[]).unwrap();
        assert!(result.items.is_empty());
        assert!(result.topics.is_empty());
        assert_eq!(result.overall_sentiment, OverallSentiment::default());
        assert_eq!(polarity.calls(), 0);
        assert!(phrases.corpora().is_empty());

        let comments = analyzer.analyze_comments(&[], true).unwrap();
        assert!(comments.items.is_empty());
        assert!(phrases.corpora().is_empty());
    }

    #[test]
    fn test_proportions_and_order() {
        let (analyzer, _, _) = analyzer(
            &[("love", 0.8), ("nice", 0.5), ("hate", -0.9)],
            CannedPhrases::new(&[], &[]),
        );
        let posts = vec![
            post("a", "love", ""),
            post("b", "nice", ""),
            post("c", "plain", ""),
            post("d", "hate", ""),
        ];
        let result = analyzer.analyze_posts(&posts).unwrap();

        let ids: Vec<&str> = result.items.iter().map(|p| p.post.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        let overall = result.overall_sentiment;
        assert_eq!(overall.positive, 0.5);
        assert_eq!(overall.neutral, 0.25);
        assert_eq!(overall.negative, 0.25);
        let expected = (0.7 * 0.8 + 0.7 * 0.5 - 0.7 * 0.9) / 4.0;
        assert!((overall.compound - expected).abs() < 1e-12);
    }

    #[test]
    fn test_topics_use_titles_then_bodies() {
        let (analyzer, _, phrases) =
            analyzer(&[], CannedPhrases::new(&["battery", "battery"], &["2024"]));
        let posts = vec![post("a", "First Title", "body one"), post("b", "Second", "Body, two!")];
        let result = analyzer.with_top_n(1).analyze_posts(&posts).unwrap();

        assert_eq!(
            phrases.corpora(),
            vec!["first title second body one body two"]
        );
        assert_eq!(
            result.topics,
            vec![Topic {
                topic: "battery".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_reanalysis_is_idempotent() {
        let (analyzer, _, _) =
            analyzer(&[("good", 0.6), ("bad", -0.4)], CannedPhrases::new(&["thing"], &[]));
        let posts = vec![post("a", "good", "bad"), post("b", "bad", "good")];
        let first = analyzer.analyze_posts(&posts).unwrap();
        let second = analyzer.analyze_posts(&posts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_item_failure_fails_batch() {
        let (analyzer, _, _) = analyzer(&[], CannedPhrases::new(&[], &[]));
        let posts = vec![post("a", "fine", ""), post("b", "explode", "")];
        assert!(matches!(
            analyzer.analyze_posts(&posts).unwrap_err(),
            Error::Scoring(_)
        ));
    }

    #[test]
    fn test_extraction_failure_fails_batch() {
        let (analyzer, _, _) = analyzer(&[], CannedPhrases::failing());
        let err = analyzer.analyze_posts(&[post("a", "t", "b")]).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        // Comments without topics never reach the extractor.
        assert!(analyzer.analyze_comments(&[comment("c", "t")], false).is_ok());
    }

    #[test]
    fn test_comments_with_and_without_topics() {
        let (analyzer, _, phrases) =
            analyzer(&[("great", 0.9)], CannedPhrases::new(&["gpu"], &[]));
        let comments = vec![comment("c1", "great"), comment("c2", "GPU prices")];

        let plain = analyzer.analyze_comments(&comments, false).unwrap();
        assert!(plain.topics.is_empty());
        assert!(phrases.corpora().is_empty());
        assert_eq!(plain.overall_sentiment.positive, 0.5);
        assert_eq!(plain.overall_sentiment.neutral, 0.5);

        let with_topics = analyzer.analyze_comments(&comments, true).unwrap();
        assert_eq!(with_topics.topics.len(), 1);
        assert_eq!(phrases.corpora(), vec!["great gpu prices"]);
        assert_eq!(plain.items, with_topics.items);
    }

    #[test]
    fn test_overall_sentiment_empty() {
        let items: Vec<AnnotatedComment> = Vec::new();
        assert_eq!(overall_sentiment(&items), OverallSentiment::default());
    }
}
