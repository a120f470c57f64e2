//! Sentiment classification for Indonesian-language product reviews.
//!
//! Three pretrained classifiers are supported, all loaded from a local
//! `models/` directory: IndoBERT and DistilBERT (ONNX exports run through
//! ONNX Runtime) and an optional BiLSTM baseline (candle, behind the
//! `recurrent` cargo feature). Loaded models are memoized per variant for
//! the lifetime of the process.
//!
//! # Basic usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sentimen::{classify, LabelSet, ModelKind, ModelLayout, ModelRegistry,
//!                PredictionReport, RuntimeConfig};
//!
//! let layout = ModelLayout::from_env();
//! layout.ensure_usable()?;
//!
//! let registry = ModelRegistry::new();
//! let prediction = classify(
//!     &registry,
//!     &layout,
//!     &RuntimeConfig::default(),
//!     ModelKind::IndoBert,
//!     "Aplikasinya bagus, tapi kadang error pas login.",
//!     true,
//! )?;
//!
//! let labels = LabelSet::load(&layout.labels_file());
//! let report = PredictionReport::new(&prediction, &labels);
//! println!("{} ({:.1}%)", report.label, report.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod labels;
pub mod report;
pub mod runtime;
pub mod text;

pub use artifacts::{DiagnosticsEntry, LayoutDiagnostics, ModelKind, ModelLayout};
pub use classifier::registry::{SharedModel, REGISTRY};
pub use classifier::{ClassifierError, ModelRegistry, Prediction, SentimentModel};
pub use labels::LabelSet;
pub use report::PredictionReport;
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}

/// Runs the full pipeline for one review: empty-input guard, optional
/// normalization, model lookup (cached after first use), forward pass.
///
/// The guard fires before any loader or dispatch work, both on raw input and
/// on input that normalization reduced to nothing.
pub fn classify(
    registry: &ModelRegistry,
    layout: &ModelLayout,
    config: &RuntimeConfig,
    kind: ModelKind,
    text: &str,
    clean: bool,
) -> Result<Prediction, ClassifierError> {
    if text.trim().is_empty() {
        return Err(ClassifierError::EmptyInput);
    }
    let processed = if clean {
        text::normalize(text)
    } else {
        text.to_string()
    };
    if processed.trim().is_empty() {
        return Err(ClassifierError::EmptyInput);
    }

    let model = registry.get_or_load(layout, config, kind)?;
    model.predict(&processed)
}
