//! Inference dispatch: one `SentimentModel` capability implemented per
//! variant, plus the process-wide registry that memoizes loaded handles.

pub mod error;
#[cfg(feature = "recurrent")]
pub mod recurrent;
pub mod registry;
pub mod transformer;

pub use error::ClassifierError;
pub use registry::ModelRegistry;
pub use transformer::TransformerClassifier;

use crate::artifacts::ModelKind;

/// Output of one forward pass, decoupled from any inference framework's
/// tensor types.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Argmax position in `probs`; ties resolve to the lowest index.
    pub index: usize,
    /// Softmax of the model's logits. A proper distribution only up to
    /// floating-point rounding; never renormalized here.
    pub probs: Vec<f32>,
}

impl Prediction {
    /// Builds a prediction from a probability vector, taking the argmax.
    pub fn from_probs(probs: Vec<f32>) -> Self {
        Self {
            index: argmax(&probs),
            probs,
        }
    }

    /// The winning probability.
    pub fn confidence(&self) -> f32 {
        self.probs.get(self.index).copied().unwrap_or(0.0)
    }
}

/// The single polymorphic capability all variants implement.
pub trait SentimentModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Runs one forward pass over already-normalized text.
    ///
    /// Callers guard against empty input before dispatching here.
    fn predict(&self, text: &str) -> Result<Prediction, ClassifierError>;
}

/// Index of the largest element; ties break to the lowest index. Empty input
/// yields 0.
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Numerically stable softmax over raw logits.
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|&x| x / sum).collect()
    } else {
        exps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.9, 0.05, 0.05]), 0);
    }

    #[test]
    fn argmax_ties_resolve_to_lowest_index() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), 0);
        assert_eq!(argmax(&[0.0, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[1.0, 1.0, 1.0]), 0);
    }

    #[test]
    fn softmax_is_a_distribution() {
        let probs = softmax(&[2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 999.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn prediction_index_is_argmax() {
        let prediction = Prediction::from_probs(vec![0.2, 0.5, 0.3]);
        assert_eq!(prediction.index, 1);
        assert!((prediction.confidence() - 0.5).abs() < f32::EPSILON);
    }
}
