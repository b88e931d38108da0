//! Classifier seam and the confidence gate in front of it.

use hand_landmarks::FeatureVector;
use sign_labels::{Label, LabelSet};
use std::fmt;
use tracing::trace;

use crate::mode::AppMode;
use crate::model::ModelError;

/// An arg-max probability must exceed this for its label to be accepted.
pub const DEFAULT_THRESHOLD: f32 = 0.75;

/// Name reported for a rejected prediction.
pub const UNKNOWN_LABEL: &str = "unknown";

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// Anything that maps a normalised feature vector to one probability per
/// class.  Output length must equal [`Classifier::num_classes`].
pub trait Classifier {
    fn num_classes(&self) -> usize;
    fn probabilities(&self, features: &FeatureVector) -> Vec<f32>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn num_classes(&self) -> usize { (**self).num_classes() }
    fn probabilities(&self, features: &FeatureVector) -> Vec<f32> {
        (**self).probabilities(features)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Prediction
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum Prediction {
    /// Not in a detect mode; the classifier was not consulted.
    Skipped,
    /// The arg-max probability exceeded the threshold.
    Known { label: Label, confidence: f32 },
    /// Nothing cleared the threshold.  `confidence` is the pseudo-confidence
    /// `∏(1 − pᵢ)`, shown for display only; it is not a probability.
    Unknown { confidence: f32 },
}

impl Prediction {
    pub fn label(&self) -> Option<&Label> {
        match self {
            Prediction::Known { label, .. } => Some(label),
            _ => None,
        }
    }

    /// The accepted label's text, or [`UNKNOWN_LABEL`].
    pub fn label_name(&self) -> Option<&str> {
        match self {
            Prediction::Skipped             => None,
            Prediction::Known { label, .. } => Some(label.as_str()),
            Prediction::Unknown { .. }      => Some(UNKNOWN_LABEL),
        }
    }

    pub fn confidence(&self) -> Option<f32> {
        match self {
            Prediction::Skipped                    => None,
            Prediction::Known   { confidence, .. } => Some(*confidence),
            Prediction::Unknown { confidence }     => Some(*confidence),
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Skipped                       => Ok(()),
            Prediction::Known { label, confidence }   => write!(f, "{} ({:.2})", label, confidence),
            Prediction::Unknown { confidence }        => write!(f, "{} ({:.2})", UNKNOWN_LABEL, confidence),
        }
    }
}

/// Gate one probability vector against `labels`.
///
/// The first maximal entry wins ties.  An empty vector, or an arg-max with
/// no matching label, is treated as unknown.
pub fn gate_probabilities(probs: &[f32], labels: &LabelSet, threshold: f32) -> Prediction {
    let best = probs.iter().copied().enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        });

    if let Some((index, p)) = best {
        if p > threshold {
            if let Some(label) = labels.get(index) {
                return Prediction::Known { label: label.clone(), confidence: p };
            }
        }
    }

    let confidence = probs.iter().map(|p| 1.0 - p).product();
    Prediction::Unknown { confidence }
}

// ════════════════════════════════════════════════════════════════════════════
// PredictionGate
// ════════════════════════════════════════════════════════════════════════════

/// A classifier paired with the labels it was trained on.
pub struct PredictionGate<C> {
    classifier: C,
    labels:     LabelSet,
    threshold:  f32,
}

impl<C: Classifier> PredictionGate<C> {
    /// Fails when the classifier's output width does not match the label
    /// count.
    pub fn new(classifier: C, labels: LabelSet, threshold: f32) -> Result<Self, ModelError> {
        if classifier.num_classes() != labels.len() {
            return Err(ModelError::ClassCount {
                classes: classifier.num_classes(),
                labels:  labels.len(),
            });
        }
        Ok(PredictionGate { classifier, labels, threshold })
    }

    pub fn labels(&self) -> &LabelSet { &self.labels }

    pub fn threshold(&self) -> f32 { self.threshold }

    /// Classify one frame.  Outside the detect modes this returns
    /// [`Prediction::Skipped`] without touching the classifier.
    pub fn predict(&self, features: &FeatureVector, mode: AppMode) -> Prediction {
        if !mode.is_detect() {
            return Prediction::Skipped;
        }
        let probs = self.classifier.probabilities(features);
        let prediction = gate_probabilities(&probs, &self.labels, self.threshold);
        trace!(%prediction, "frame classified");
        prediction
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::FEATURE_LEN;
    use std::cell::Cell;

    struct Fixed {
        probs: Vec<f32>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(probs: &[f32]) -> Self { Fixed { probs: probs.to_vec(), calls: Cell::new(0) } }
    }

    impl Classifier for Fixed {
        fn num_classes(&self) -> usize { self.probs.len() }
        fn probabilities(&self, _: &FeatureVector) -> Vec<f32> {
            self.calls.set(self.calls.get() + 1);
            self.probs.clone()
        }
    }

    fn abc() -> LabelSet { LabelSet::from_lines("a\nb\nc\n") }

    const ZERO: FeatureVector = [0.0; FEATURE_LEN];

    #[test]
    fn confident_argmax_is_accepted() {
        let gate = PredictionGate::new(Fixed::new(&[0.05, 0.9, 0.05]), abc(), DEFAULT_THRESHOLD).unwrap();
        let p = gate.predict(&ZERO, AppMode::DetectStatic);
        assert_eq!(p, Prediction::Known { label: Label::from("b"), confidence: 0.9 });
        assert_eq!(p.to_string(), "b (0.90)");
    }

    #[test]
    fn threshold_is_exclusive() {
        let labels = abc();
        let at = gate_probabilities(&[0.75, 0.2, 0.05], &labels, 0.75);
        assert!(matches!(at, Prediction::Unknown { .. }));
        let above = gate_probabilities(&[0.76, 0.2, 0.04], &labels, 0.75);
        assert_eq!(above.label(), Some(&Label::from("a")));
    }

    #[test]
    fn low_confidence_reports_unknown_with_product() {
        let labels = LabelSet::from_lines("a\nb\nc\nd\n");
        let p = gate_probabilities(&[0.2, 0.3, 0.1, 0.4], &labels, DEFAULT_THRESHOLD);
        let expected = 0.8 * 0.7 * 0.9 * 0.6;
        match &p {
            Prediction::Unknown { confidence } => assert!((*confidence - expected).abs() < 1e-6),
            other => panic!("expected unknown, got {:?}", other),
        }
        assert!(p.label().is_none());
        assert_eq!(p.label_name(), Some("unknown"));
        assert_eq!(p.to_string(), "unknown (0.30)");
    }

    #[test]
    fn ties_pick_the_first_class() {
        let p = gate_probabilities(&[0.0, 0.8, 0.8], &abc(), 0.5);
        assert_eq!(p.label(), Some(&Label::from("b")));
    }

    #[test]
    fn empty_probabilities_are_unknown() {
        assert_eq!(gate_probabilities(&[], &abc(), 0.5), Prediction::Unknown { confidence: 1.0 });
    }

    #[test]
    fn non_detect_modes_skip_the_classifier() {
        let gate = PredictionGate::new(Fixed::new(&[1.0, 0.0, 0.0]), abc(), DEFAULT_THRESHOLD).unwrap();
        for mode in [AppMode::Free, AppMode::SaveStatic, AppMode::SaveDynamic, AppMode::Quit] {
            assert_eq!(gate.predict(&ZERO, mode), Prediction::Skipped);
        }
        assert_eq!(gate.classifier.calls.get(), 0);
        gate.predict(&ZERO, AppMode::DetectDynamic);
        assert_eq!(gate.classifier.calls.get(), 1);
    }

    #[test]
    fn class_count_mismatch_is_rejected() {
        let err = PredictionGate::new(Fixed::new(&[0.5, 0.5]), abc(), DEFAULT_THRESHOLD).err();
        assert!(matches!(err, Some(ModelError::ClassCount { classes: 2, labels: 3 })));
    }

    #[test]
    fn boxed_classifiers_work() {
        let boxed: Box<dyn Classifier> = Box::new(Fixed::new(&[0.0, 0.0, 1.0]));
        let gate = PredictionGate::new(boxed, abc(), DEFAULT_THRESHOLD).unwrap();
        assert_eq!(gate.predict(&ZERO, AppMode::DetectStatic).label(), Some(&Label::from("c")));
    }
}
