//! SubPulse Infer: optional learned sentiment classifier.
//!
//! Provides the `SentimentClassifier` trait. When the `onnx` feature is
//! enabled and model files are present, `OnnxClassifier` loads a
//! sequence-classification model (e.g. DistilBERT fine-tuned on SST-2).
//! Without it, no classifier is installed and scores come from the lexicon only.

pub mod cache;
pub mod classifier;
pub mod onnx_classifier;

pub use cache::ClassificationCache;
pub use classifier::{truncate_chars, Classification, SentimentClassifier, DEFAULT_MAX_INPUT_CHARS};

#[cfg(feature = "onnx")]
pub use onnx_classifier::OnnxClassifier;

use std::path::Path;
use std::sync::Arc;

/// Create the secondary classifier for the given model directory, if possible.
///
/// Tries ONNX (if feature enabled and model files present); otherwise
/// returns `None` and the pipeline degrades to lexicon scores only.
pub fn create_classifier(model_dir: &Path) -> Option<Arc<dyn SentimentClassifier>> {
    #[cfg(feature = "onnx")]
    {
        match OnnxClassifier::load(model_dir) {
            Ok(classifier) => {
                tracing::info!("Using ONNX sentiment classifier from {}", model_dir.display());
                return Some(Arc::new(classifier));
            }
            Err(e) => {
                tracing::warn!("ONNX classifier unavailable: {}. Using lexicon scores only.", e);
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::warn!("ONNX feature disabled. Using lexicon scores only.");
    }

    None
}
