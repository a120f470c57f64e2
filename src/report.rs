use log::debug;
use serde::Serialize;

use crate::classifier::Prediction;
use crate::labels::LabelSet;

/// One `(label, probability)` row of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub probability: f32,
}

/// User-facing view of a [`Prediction`] against a [`LabelSet`].
///
/// Total for any well-typed input: an out-of-range winning index becomes the
/// synthetic `class_<index>` label, and labels beyond the probability
/// vector's end score `0.0`. The recurrent model's output width is not
/// guaranteed to match the label count, so the zero-padding here is policy
/// rather than a correctness claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Resolved label for the winning class.
    pub label: String,
    /// One entry per label, in label order.
    pub scores: Vec<LabelScore>,
    /// Probability of the winning class.
    pub confidence: f32,
}

impl PredictionReport {
    pub fn new(prediction: &Prediction, labels: &LabelSet) -> Self {
        if prediction.probs.len() < labels.len() {
            debug!(
                "Probability vector has {} entries for {} labels; padding with 0.0",
                prediction.probs.len(),
                labels.len()
            );
        }
        let scores = (0..labels.len())
            .map(|i| LabelScore {
                label: labels.resolve(i),
                probability: prediction.probs.get(i).copied().unwrap_or(0.0),
            })
            .collect();
        Self {
            label: labels.resolve(prediction.index),
            scores,
            confidence: prediction.confidence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_winning_label() {
        let prediction = Prediction::from_probs(vec![0.1, 0.2, 0.7]);
        let report = PredictionReport::new(&prediction, &LabelSet::default());
        assert_eq!(report.label, "positive");
        assert!((report.confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(report.scores.len(), 3);
    }

    #[test]
    fn out_of_range_index_gets_synthetic_label() {
        let prediction = Prediction {
            index: 5,
            probs: vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        };
        let labels = LabelSet::from_names(["negative", "positive"]);
        let report = PredictionReport::new(&prediction, &labels);
        assert_eq!(report.label, "class_5");
    }

    #[test]
    fn short_probability_vector_pads_with_zero() {
        let prediction = Prediction::from_probs(vec![0.6, 0.4]);
        let labels = LabelSet::default();
        let report = PredictionReport::new(&prediction, &labels);
        assert_eq!(report.scores.len(), 3);
        assert_eq!(report.scores[2].probability, 0.0);
        assert_eq!(report.scores[2].label, "positive");
    }

    #[test]
    fn long_probability_vector_keeps_label_order() {
        let prediction = Prediction::from_probs(vec![0.1, 0.2, 0.3, 0.4]);
        let labels = LabelSet::from_names(["a", "b"]);
        let report = PredictionReport::new(&prediction, &labels);
        assert_eq!(report.scores.len(), 2);
        assert_eq!(report.label, "class_3");
    }
}
