//! # hand_landmarks
//!
//! The 21 keypoints a hand tracker reports for one detected hand, and the
//! wrist-relative flattening that turns them into a classifier input.
//!
//! Coordinates are normalised to the frame: `x` and `y` both lie in
//! `[0, 1]`, with the origin at the top-left corner.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_landmarks::{HandLandmarks, Landmark, normalize, LANDMARK_COUNT};
//!
//! let points: Vec<Landmark> = (0..LANDMARK_COUNT)
//!     .map(|i| Landmark::new(0.5 + i as f32 * 0.01, 0.5))
//!     .collect();
//! let hand = HandLandmarks::from_slice(&points).unwrap();
//!
//! let features = normalize(&hand);
//! assert_eq!(features[0], 0.0);   // the wrist is always the origin
//! assert_eq!(features[1], 0.0);
//! ```

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Sizes
// ════════════════════════════════════════════════════════════════════════════

/// Keypoints per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Length of a normalised feature vector (two coordinates per keypoint).
pub const FEATURE_LEN: usize = LANDMARK_COUNT * 2;

/// Wrist-relative `(dx, dy)` pairs, flattened in landmark order.
pub type FeatureVector = [f32; FEATURE_LEN];

/// Index of the wrist keypoint, the origin of every feature vector.
pub const WRIST: usize = 0;

/// Bone segments used when drawing a hand skeleton.
pub const CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One 2-D keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self { Landmark { x, y } }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// Returned when a tracker hands over something other than a full hand.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
pub struct LandmarkCountError(pub usize);

/// All keypoints of a single hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

/// Axis-aligned box around a hand, in normalised frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from a tracker's point list.  Anything but exactly
    /// [`LANDMARK_COUNT`] points is rejected.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkCountError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkCountError(points.len()))?;
        Ok(HandLandmarks { points })
    }

    /// Rebuild a hand from a normalised vector by placing its wrist at
    /// `origin`.  `normalize(&from_features(o, v)) == v` up to float rounding.
    pub fn from_features(origin: Landmark, features: &FeatureVector) -> Self {
        let mut points = [origin; LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            p.x = origin.x + features[2 * i];
            p.y = origin.y + features[2 * i + 1];
        }
        HandLandmarks { points }
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    pub fn wrist(&self) -> Landmark { self.points[WRIST] }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds { min_x: 1.0, min_y: 1.0, max_x: 0.0, max_y: 0.0 };
        for p in &self.points {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        b
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Normalisation
// ════════════════════════════════════════════════════════════════════════════

/// Translate every keypoint so the wrist sits at the origin and flatten to
/// `[dx0, dy0, dx1, dy1, …]`.
pub fn normalize(hand: &HandLandmarks) -> FeatureVector {
    let wrist = hand.wrist();
    let mut out = [0.0f32; FEATURE_LEN];
    for (i, p) in hand.points.iter().enumerate() {
        out[2 * i]     = p.x - wrist.x;
        out[2 * i + 1] = p.y - wrist.y;
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker: the external detector
// ════════════════════════════════════════════════════════════════════════════

/// Anything that reports the hands visible in the current frame.
///
/// Implementations block until the next frame is available.  An empty
/// vector means no hand was detected.
pub trait HandTracker {
    fn detect(&mut self) -> Vec<HandLandmarks>;
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn fan_hand() -> HandLandmarks {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        for (i, p) in pts.iter_mut().enumerate() {
            *p = Landmark::new(0.30 + i as f32 * 0.01, 0.70 - i as f32 * 0.02);
        }
        HandLandmarks::new(pts)
    }

    #[test]
    fn wrist_normalizes_to_origin() {
        let v = normalize(&fan_hand());
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn wrist_is_the_first_keypoint() {
        let hand = fan_hand();
        assert_eq!(WRIST, 0);
        assert_eq!(hand.wrist(), hand.points()[0]);
        assert!(CONNECTIONS.iter().any(|&(a, _)| a == WRIST));
    }

    #[test]
    fn feature_layout_is_interleaved() {
        let hand = fan_hand();
        let v = normalize(&hand);
        assert_eq!(v.len(), 42);
        let p = hand.points()[5];
        assert!((v[10] - (p.x - 0.30)).abs() < 1e-6);
        assert!((v[11] - (p.y - 0.70)).abs() < 1e-6);
    }

    #[test]
    fn normalization_is_translation_invariant() {
        let hand = fan_hand();
        let shifted: Vec<Landmark> = hand.points().iter()
            .map(|p| Landmark::new(p.x + 0.1, p.y - 0.2))
            .collect();
        let shifted = HandLandmarks::from_slice(&shifted).unwrap();
        let a = normalize(&hand);
        let b = normalize(&shifted);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn short_point_list_rejected() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(HandLandmarks::from_slice(&pts), Err(LandmarkCountError(20)));
        assert!(HandLandmarks::from_slice(&[]).is_err());
    }

    #[test]
    fn from_features_inverts_normalize() {
        let v = normalize(&fan_hand());
        let rebuilt = HandLandmarks::from_features(Landmark::new(0.5, 0.5), &v);
        assert_eq!(rebuilt.wrist(), Landmark::new(0.5, 0.5));
        let again = normalize(&rebuilt);
        for (x, y) in v.iter().zip(again.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn bounds_cover_all_points() {
        let b = fan_hand().bounds();
        assert!((b.min_x - 0.30).abs() < 1e-6);
        assert!((b.max_x - 0.50).abs() < 1e-6);
        assert!((b.min_y - 0.30).abs() < 1e-6);
        assert!((b.max_y - 0.70).abs() < 1e-6);
    }
}
