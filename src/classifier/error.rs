use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between user text and a prediction.
///
/// The CLI matches on these kinds to decide what is fatal, what is a
/// user-correctable warning, and what just means "pick another model".
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Neither transformer model directory exists. Fatal at startup. The
    /// message names every expected artifact path so the diagnostic is
    /// complete even without the `diag` panel.
    #[error(
        "no usable model artifacts found under {}; expected layout:\n{}",
        .searched.display(),
        join_paths(.expected)
    )]
    NoModelsAvailable {
        searched: PathBuf,
        expected: Vec<PathBuf>,
    },

    /// The BiLSTM was selected but this build lacks the recurrent backend.
    #[error("recurrent backend not compiled in; rebuild with `--features recurrent` to use the BiLSTM model")]
    BackendMissing,

    /// A required file or directory for the selected model is absent.
    #[error("model artifact missing: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// Input was empty (or empty after normalization); no inference attempted.
    #[error("input text is empty")]
    EmptyInput,

    /// Tokenization or vocabulary lookup failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Model load or forward pass failed inside the inference backend.
    #[error("inference error: {0}")]
    Inference(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::Inference(err.to_string())
    }
}
