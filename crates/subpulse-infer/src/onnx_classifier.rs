//! ONNX-based sentiment classifier (DistilBERT/BERT sequence classification).
//!
//! Loads an exported `*-finetuned-sst-2` style model plus its HuggingFace
//! tokenizer and returns the arg-max label with its softmax probability.
//! Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{debug, info};

    use subpulse_core::{Error, Result};

    use crate::cache::ClassificationCache;
    use crate::classifier::{Classification, SentimentClassifier, DEFAULT_MAX_INPUT_CHARS};

    /// Maximum token sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    /// `id2label` keys at or above this are ignored.
    const MAX_LABELS: usize = 1024;

    /// Model families exported without `token_type_ids`.
    const TWO_INPUT_MODELS: &[&str] = &["distilbert", "roberta", "xlm-roberta"];

    /// ONNX sequence-classification engine.
    pub struct OnnxClassifier {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        labels: Vec<String>,
        uses_token_type_ids: bool,
        cache: ClassificationCache,
    }

    impl OnnxClassifier {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/model.onnx`: the ONNX model file
        /// - `model_dir/tokenizer.json`: the HuggingFace tokenizer
        /// - `model_dir/config.json`: optional, for `id2label` and `model_type`
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Classifier(format!(
                    "Model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Classifier(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            let model_config = read_model_config(&model_dir.join("config.json"));
            let labels = labels_from_config(model_config.as_ref());
            let uses_token_type_ids = model_config
                .as_ref()
                .and_then(|c| c.get("model_type"))
                .and_then(|t| t.as_str())
                .map(|t| !TWO_INPUT_MODELS.contains(&t))
                .unwrap_or(false);

            // With load-dynamic feature, ORT_DYLIB_PATH env var must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| Error::Classifier(format!("Failed to create session builder: {}", e)))?
                .with_intra_threads(2)
                .map_err(|e| Error::Classifier(format!("Failed to set threads: {}", e)))?
                .commit_from_file(&model_path)
                .map_err(|e| Error::Classifier(format!("Failed to load ONNX model: {}", e)))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Classifier(format!("Failed to load tokenizer: {}", e)))?;

            info!(
                "ONNX classifier loaded: labels={:?}, model={}",
                labels,
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                labels,
                uses_token_type_ids,
                cache: ClassificationCache::default_cache(),
            })
        }

        fn infer(&self, text: &str) -> Result<Classification> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Classifier(format!("Tokenization failed: {}", e)))?;

            let seq_len = encoding.get_ids().len().min(MAX_SEQ_LEN);
            let ids_data: Vec<i64> = encoding.get_ids()[..seq_len]
                .iter()
                .map(|&id| id as i64)
                .collect();
            let mask_data: Vec<i64> = encoding.get_attention_mask()[..seq_len]
                .iter()
                .map(|&m| m as i64)
                .collect();

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(|e| Error::Classifier(format!("Failed to create ids tensor: {}", e)))?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(|e| Error::Classifier(format!("Failed to create mask tensor: {}", e)))?;

            let mut session = self.session.lock();
            let outputs = if self.uses_token_type_ids {
                let type_ids_tensor = Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))
                    .map_err(|e| {
                        Error::Classifier(format!("Failed to create type_ids tensor: {}", e))
                    })?;
                session.run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
            } else {
                session.run(ort::inputs![ids_tensor, mask_tensor])
            }
            .map_err(|e| Error::Classifier(format!("ONNX inference failed: {}", e)))?;

            // Logits: [1, num_labels]
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Classifier(format!("Failed to extract logits: {}", e)))?;
            let num_labels = shape.last().copied().unwrap_or(0) as usize;
            if num_labels == 0 || data.len() < num_labels {
                return Err(Error::Classifier(format!(
                    "Unexpected logits shape: {:?}",
                    shape.iter().collect::<Vec<_>>()
                )));
            }

            let probs = softmax(Array1::from_vec(data[..num_labels].to_vec()));
            let (best, score) = probs
                .iter()
                .enumerate()
                .fold((0usize, f32::MIN), |acc, (i, &p)| if p > acc.1 { (i, p) } else { acc });

            let label = self
                .labels
                .get(best)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{}", best));

            Ok(Classification {
                label,
                score: score as f64,
            })
        }
    }

    impl SentimentClassifier for OnnxClassifier {
        fn classify(&self, text: &str) -> Result<Classification> {
            if let Some(cached) = self.cache.get(text) {
                debug!("Classifier cache hit");
                return Ok(cached);
            }

            let result = self.infer(text)?;
            self.cache.put(text.to_string(), result.clone());
            Ok(result)
        }

        fn max_input_chars(&self) -> usize {
            DEFAULT_MAX_INPUT_CHARS
        }

        fn name(&self) -> &str {
            "onnx"
        }
    }

    fn softmax(logits: Array1<f32>) -> Array1<f32> {
        let max = logits.fold(f32::MIN, |a, &b| a.max(b));
        let exp = logits.mapv(|x| (x - max).exp());
        let sum = exp.sum();
        exp / sum
    }

    fn read_model_config(path: &Path) -> Option<serde_json::Value> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Labels indexed by class id; SST-2 defaults when absent. Ids missing
    /// from a sparse `id2label` keep their `LABEL_{i}` placeholder.
    fn labels_from_config(config: Option<&serde_json::Value>) -> Vec<String> {
        let pairs: Vec<(usize, String)> = config
            .and_then(|c| c.get("id2label"))
            .and_then(|m| m.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| Some((k.parse().ok()?, v.as_str()?.to_string())))
                    .filter(|(i, _)| *i < MAX_LABELS)
                    .collect()
            })
            .unwrap_or_default();

        let Some(max_id) = pairs.iter().map(|(i, _)| *i).max() else {
            return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
        };
        let mut labels: Vec<String> = (0..=max_id).map(|i| format!("LABEL_{}", i)).collect();
        for (i, label) in pairs {
            labels[i] = label;
        }
        labels
    }

}

#[cfg(feature = "onnx")]
pub use inner::OnnxClassifier;
