use log::{debug, info};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use super::{softmax, ClassifierError, Prediction, SentimentModel};
use crate::artifacts::{ModelKind, ModelLayout};
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Token budget for the transformer variants; encodings are truncated here.
pub const MAX_SEQ_LEN: usize = 128;

/// An ONNX-exported sequence-classification model plus its subword tokenizer.
///
/// Covers both transformer variants (IndoBERT and DistilBERT); the layout
/// decides where the files live, the `ModelKind` which directory to use. The
/// exported graph is inference-only, so there is no train/eval mode to set.
pub struct TransformerClassifier {
    kind: ModelKind,
    tokenizer: Tokenizer,
    // Session::run takes &mut self; the Mutex lets predict keep its &self
    // signature required by the Send + Sync SentimentModel trait.
    session: Mutex<Session>,
}

impl TransformerClassifier {
    /// Loads `model.onnx` and `tokenizer.json` from the variant's directory.
    ///
    /// Fails with [`ClassifierError::ArtifactMissing`] naming the first
    /// absent path.
    pub fn load(
        layout: &ModelLayout,
        config: &RuntimeConfig,
        kind: ModelKind,
    ) -> Result<Self, ClassifierError> {
        debug_assert!(kind.is_transformer());

        let model_dir = layout.model_dir(kind);
        if !model_dir.is_dir() {
            return Err(ClassifierError::ArtifactMissing(model_dir));
        }
        let onnx_file = layout.onnx_file(kind);
        if !onnx_file.exists() {
            return Err(ClassifierError::ArtifactMissing(onnx_file));
        }
        let tokenizer_file = layout.tokenizer_file(kind);
        if !tokenizer_file.exists() {
            return Err(ClassifierError::ArtifactMissing(tokenizer_file));
        }

        let tokenizer = Tokenizer::from_file(&tokenizer_file)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;
        let session = create_session_builder(config)?.commit_from_file(&onnx_file)?;
        info!("Loaded {} from {:?}", kind.display_name(), model_dir);

        Ok(Self {
            kind,
            tokenizer,
            session: Mutex::new(session),
        })
    }

    /// Subword-encodes `text` and truncates to [`MAX_SEQ_LEN`].
    fn encode(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>), ClassifierError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::Tokenizer(e.to_string()))?;

        let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mut mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        ids.truncate(MAX_SEQ_LEN);
        mask.truncate(MAX_SEQ_LEN);
        Ok((ids, mask))
    }
}

impl SentimentModel for TransformerClassifier {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let (ids, mask) = self.encode(text)?;
        let seq_len = ids.len();
        debug!("{}: {} input tokens", self.kind, seq_len);

        let ids_array = Array2::from_shape_vec((1, seq_len), ids)
            .map_err(|e| ClassifierError::Inference(format!("Failed to shape input ids: {}", e)))?;
        let ids_dyn = ids_array.into_dyn();

        let mask_array = Array2::from_shape_vec((1, seq_len), mask).map_err(|e| {
            ClassifierError::Inference(format!("Failed to shape attention mask: {}", e))
        })?;
        let mask_dyn = mask_array.into_dyn();

        let mut inputs = HashMap::new();
        inputs.insert("input_ids", Tensor::from_array(ids_dyn)?);
        inputs.insert("attention_mask", Tensor::from_array(mask_dyn)?);

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::Inference(format!("Session lock poisoned: {}", e)))?;
        let outputs = session.run(inputs)?;
        let logits = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Failed to extract logits: {}", e)))?;

        // Logits come back as [1, num_labels].
        let row: Vec<f32> = logits.slice(ndarray::s![0, ..]).iter().copied().collect();
        Ok(Prediction::from_probs(softmax(&row)))
    }
}
