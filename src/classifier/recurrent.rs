//! BiLSTM baseline backend, compiled only with the `recurrent` feature.
//!
//! The artifact set is `model.safetensors` (weights), `config.json` (layer
//! dimensions) and `vocab.json` (closed word-to-id vocabulary). Weight
//! tensors follow the usual PyTorch LSTM naming under the prefixes
//! `embedding`, `lstm_fwd`, `lstm_bwd` and `classifier`.

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{lstm, Embedding, LSTMConfig, Linear, Module, VarBuilder, LSTM, RNN};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{softmax, ClassifierError, Prediction, SentimentModel};
use crate::artifacts::{ModelKind, ModelLayout};

/// Fixed sequence length; shorter inputs are post-padded with id 0.
pub const MAX_SEQ_LEN: usize = 100;

/// Vocabulary entry used for out-of-vocabulary words, when present.
const OOV_TOKEN: &str = "<OOV>";

#[derive(Debug, Clone, Deserialize)]
struct BilstmDims {
    vocab_size: usize,
    embedding_dim: usize,
    hidden_dim: usize,
    num_classes: usize,
}

/// Closed word-index vocabulary for the recurrent path.
///
/// Words missing from the map take the `<OOV>` id when the vocabulary defines
/// one and are dropped otherwise.
struct Vocab {
    index: HashMap<String, u32>,
    oov_id: Option<u32>,
}

impl Vocab {
    fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClassifierError::Tokenizer(format!("Failed to read {:?}: {}", path, e)))?;
        let index: HashMap<String, u32> = serde_json::from_str(&raw).map_err(|e| {
            ClassifierError::Tokenizer(format!("Vocabulary {:?} is not a word-id map: {}", path, e))
        })?;
        let oov_id = index.get(OOV_TOKEN).copied();
        Ok(Self { index, oov_id })
    }

    /// Maps whitespace-split words to ids, truncated and post-padded with 0
    /// to [`MAX_SEQ_LEN`].
    fn encode(&self, text: &str) -> Vec<u32> {
        let mut ids: Vec<u32> = text
            .split_whitespace()
            .filter_map(|word| self.index.get(word).copied().or(self.oov_id))
            .take(MAX_SEQ_LEN)
            .collect();
        ids.resize(MAX_SEQ_LEN, 0);
        ids
    }
}

/// Embedding, a forward and a backward LSTM, and a dense head over the
/// concatenated final hidden states.
pub struct BilstmClassifier {
    vocab: Vocab,
    embedding: Embedding,
    lstm_fwd: LSTM,
    lstm_bwd: LSTM,
    classifier: Linear,
    device: Device,
}

fn backend_err(e: candle_core::Error) -> ClassifierError {
    ClassifierError::Inference(e.to_string())
}

impl BilstmClassifier {
    /// Loads weights, dims and vocabulary, failing with
    /// [`ClassifierError::ArtifactMissing`] on the first absent path.
    pub fn load(layout: &ModelLayout) -> Result<Self, ClassifierError> {
        let weights = layout.bilstm_weights();
        if !weights.exists() {
            return Err(ClassifierError::ArtifactMissing(weights));
        }
        let config_file = layout.bilstm_config();
        if !config_file.exists() {
            return Err(ClassifierError::ArtifactMissing(config_file));
        }
        let vocab_file = layout.bilstm_vocab();
        if !vocab_file.exists() {
            return Err(ClassifierError::ArtifactMissing(vocab_file));
        }

        let raw = fs::read_to_string(&config_file).map_err(|e| {
            ClassifierError::Inference(format!("Failed to read {:?}: {}", config_file, e))
        })?;
        let dims: BilstmDims = serde_json::from_str(&raw).map_err(|e| {
            ClassifierError::Inference(format!("Invalid BiLSTM config {:?}: {}", config_file, e))
        })?;

        let device = Device::Cpu;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)
                .map_err(backend_err)?
        };

        let embedding = candle_nn::embedding(dims.vocab_size, dims.embedding_dim, vb.pp("embedding"))
            .map_err(backend_err)?;
        let lstm_fwd = lstm(
            dims.embedding_dim,
            dims.hidden_dim,
            LSTMConfig::default(),
            vb.pp("lstm_fwd"),
        )
        .map_err(backend_err)?;
        let lstm_bwd = lstm(
            dims.embedding_dim,
            dims.hidden_dim,
            LSTMConfig::default(),
            vb.pp("lstm_bwd"),
        )
        .map_err(backend_err)?;
        let classifier = candle_nn::linear(2 * dims.hidden_dim, dims.num_classes, vb.pp("classifier"))
            .map_err(backend_err)?;

        let vocab = Vocab::load(&vocab_file)?;
        info!(
            "Loaded BiLSTM ({} words, {} classes) from {:?}",
            vocab.index.len(),
            dims.num_classes,
            layout.model_dir(ModelKind::Bilstm)
        );

        Ok(Self {
            vocab,
            embedding,
            lstm_fwd,
            lstm_bwd,
            classifier,
            device,
        })
    }

    fn forward(&self, ids: &[u32]) -> Result<Vec<f32>, ClassifierError> {
        let input = Tensor::new(ids, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(backend_err)?;
        // [1, seq_len, embedding_dim]
        let embedded = self.embedding.forward(&input).map_err(backend_err)?;

        let fwd_states = self.lstm_fwd.seq(&embedded).map_err(backend_err)?;
        let reversed: Vec<u32> = (0..ids.len() as u32).rev().collect();
        let rev_index = Tensor::new(reversed.as_slice(), &self.device).map_err(backend_err)?;
        let embedded_rev = embedded.index_select(&rev_index, 1).map_err(backend_err)?;
        let bwd_states = self.lstm_bwd.seq(&embedded_rev).map_err(backend_err)?;

        let h_fwd = fwd_states
            .last()
            .ok_or_else(|| ClassifierError::Inference("empty forward LSTM state".to_string()))?
            .h();
        let h_bwd = bwd_states
            .last()
            .ok_or_else(|| ClassifierError::Inference("empty backward LSTM state".to_string()))?
            .h();

        let hidden = Tensor::cat(&[h_fwd, h_bwd], D::Minus1).map_err(backend_err)?;
        let logits = self
            .classifier
            .forward(&hidden)
            .and_then(|t| t.squeeze(0))
            .map_err(backend_err)?;
        logits.to_vec1::<f32>().map_err(backend_err)
    }
}

impl SentimentModel for BilstmClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Bilstm
    }

    fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let ids = self.vocab.encode(text);
        debug!(
            "bilstm: {} real tokens of {}",
            ids.iter().filter(|&&id| id != 0).count(),
            MAX_SEQ_LEN
        );
        let logits = self.forward(&ids)?;
        Ok(Prediction::from_probs(softmax(&logits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vocab(with_oov: bool) -> Vocab {
        let mut index = HashMap::new();
        index.insert("bagus".to_string(), 2);
        index.insert("jelek".to_string(), 3);
        if with_oov {
            index.insert(OOV_TOKEN.to_string(), 1);
        }
        let oov_id = index.get(OOV_TOKEN).copied();
        Vocab { index, oov_id }
    }

    #[test]
    fn encode_pads_post_to_fixed_length() {
        let ids = test_vocab(false).encode("bagus jelek");
        assert_eq!(ids.len(), MAX_SEQ_LEN);
        assert_eq!(&ids[..2], &[2, 3]);
        assert!(ids[2..].iter().all(|&id| id == 0));
    }

    #[test]
    fn unknown_words_use_oov_when_defined() {
        let ids = test_vocab(true).encode("bagus asing");
        assert_eq!(&ids[..2], &[2, 1]);
    }

    #[test]
    fn unknown_words_dropped_without_oov() {
        let ids = test_vocab(false).encode("asing bagus");
        assert_eq!(ids[0], 2);
        assert!(ids[1..].iter().all(|&id| id == 0));
    }

    #[test]
    fn encode_truncates_long_input() {
        let vocab = test_vocab(false);
        let long = "bagus ".repeat(MAX_SEQ_LEN * 2);
        assert_eq!(vocab.encode(&long).len(), MAX_SEQ_LEN);
    }
}
