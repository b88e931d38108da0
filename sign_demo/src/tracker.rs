//! Keyboard-driven stand-in for a camera hand tracker.
//!
//! The window forwards arrow keys and `Space` as [`SimInput`] events over a
//! channel.  [`SimHandSource`] drains them once per frame and reports either
//! no hand or one hand: a recorded dataset sample replayed around a fixed
//! wrist position.  With no recorded samples a single resting pose is used.
//!
//! | Key | Effect |
//! |---|---|
//! | `→` / `↓` | next sample |
//! | `←` / `↑` | previous sample |
//! | `Space` | show / hide the hand |

use hand_landmarks::{FeatureVector, HandLandmarks, HandTracker, Landmark, FEATURE_LEN};
use sign_labels::Sample;
use std::sync::mpsc::Receiver;

/// Where the simulated wrist sits, in normalised frame coordinates.
pub const SIM_WRIST: Landmark = Landmark::new(0.5, 0.78);

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    NextSample,
    PrevSample,
    ToggleHand,
}

pub struct SimHandSource {
    rx:       Receiver<SimInput>,
    samples:  Vec<Sample>,
    index:    usize,
    visible:  bool,
}

impl SimHandSource {
    /// An empty `samples` list falls back to a single resting pose.
    pub fn new(rx: Receiver<SimInput>, samples: Vec<Sample>) -> Self {
        let samples = if samples.is_empty() {
            vec![Sample { label_index: 0, features: resting_pose() }]
        } else {
            samples
        };
        SimHandSource { rx, samples, index: 0, visible: true }
    }

    pub fn is_visible(&self) -> bool { self.visible }

    pub fn current(&self) -> &Sample { &self.samples[self.index] }

    /// Short description for the window's status line.
    pub fn status(&self) -> String {
        if self.visible {
            format!("sim hand: sample {}/{}", self.index + 1, self.samples.len())
        } else {
            "sim hand: hidden".to_string()
        }
    }

    fn apply(&mut self, input: SimInput) {
        let n = self.samples.len();
        match input {
            SimInput::NextSample => self.index = (self.index + 1) % n,
            SimInput::PrevSample => self.index = (self.index + n - 1) % n,
            SimInput::ToggleHand => self.visible = !self.visible,
        }
    }
}

impl HandTracker for SimHandSource {
    fn detect(&mut self) -> Vec<HandLandmarks> {
        while let Ok(input) = self.rx.try_recv() {
            self.apply(input);
        }
        if !self.visible {
            return Vec::new();
        }
        vec![HandLandmarks::from_features(SIM_WRIST, &self.current().features)]
    }
}

/// An open hand, fingers up, as wrist-relative offsets.
pub fn resting_pose() -> FeatureVector {
    const POINTS: [(f32, f32); 21] = [
        ( 0.000,  0.000),                                                       // wrist
        (-0.060, -0.040), (-0.100, -0.090), (-0.130, -0.140), (-0.150, -0.180), // thumb
        (-0.050, -0.170), (-0.060, -0.240), (-0.065, -0.290), (-0.070, -0.330), // index
        ( 0.000, -0.180), ( 0.000, -0.260), ( 0.000, -0.320), ( 0.000, -0.360), // middle
        ( 0.045, -0.170), ( 0.055, -0.240), ( 0.060, -0.290), ( 0.065, -0.330), // ring
        ( 0.085, -0.140), ( 0.105, -0.190), ( 0.115, -0.230), ( 0.125, -0.260), // pinky
    ];
    let mut out = [0.0; FEATURE_LEN];
    for (i, (x, y)) in POINTS.iter().enumerate() {
        out[2 * i]     = *x;
        out[2 * i + 1] = *y;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::normalize;
    use std::sync::mpsc;

    fn sample(label_index: usize, first: f32) -> Sample {
        let mut features = [0.0; FEATURE_LEN];
        features[2] = first;
        Sample { label_index, features }
    }

    #[test]
    fn replays_current_sample_at_fixed_wrist() {
        let (_tx, rx) = mpsc::channel();
        let mut src = SimHandSource::new(rx, vec![sample(3, 0.1)]);
        let hands = src.detect();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].wrist(), SIM_WRIST);
        let f = normalize(&hands[0]);
        assert!((f[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn arrow_inputs_cycle_samples() {
        let (tx, rx) = mpsc::channel();
        let mut src = SimHandSource::new(rx, vec![sample(0, 0.1), sample(1, 0.2), sample(2, 0.3)]);
        tx.send(SimInput::PrevSample).unwrap();
        src.detect();
        assert_eq!(src.current().label_index, 2);
        tx.send(SimInput::NextSample).unwrap();
        tx.send(SimInput::NextSample).unwrap();
        src.detect();
        assert_eq!(src.current().label_index, 1);
        assert_eq!(src.status(), "sim hand: sample 2/3");
    }

    #[test]
    fn hidden_hand_is_not_detected() {
        let (tx, rx) = mpsc::channel();
        let mut src = SimHandSource::new(rx, Vec::new());
        tx.send(SimInput::ToggleHand).unwrap();
        assert!(src.detect().is_empty());
        assert!(!src.is_visible());
        tx.send(SimInput::ToggleHand).unwrap();
        assert_eq!(src.detect().len(), 1);
    }

    #[test]
    fn resting_pose_fits_in_frame() {
        let hand = HandLandmarks::from_features(SIM_WRIST, &resting_pose());
        let b = hand.bounds();
        assert!(b.min_x > 0.0 && b.max_x < 1.0);
        assert!(b.min_y > 0.0 && b.max_y < 1.0);
        assert_eq!(normalize(&hand)[0], 0.0);
    }
}
