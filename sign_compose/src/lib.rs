//! # sign_compose
//!
//! The text-composition core of the sign recogniser.
//!
//! Predictions arrive once per camera frame, far faster than anyone can hold
//! a sign on purpose.  This crate turns that stream into text:
//!
//! 1. [`ModeController`]: which of the application modes is active.  Only
//!    the two detect modes run the rest of the pipeline.
//! 2. [`PredictionGate`]: calls the [`Classifier`] (only in a detect mode)
//!    and accepts the arg-max label when it clears the confidence threshold.
//! 3. [`Composer`]: applies accepted labels to the active word and the
//!    sentence, honouring the control labels.
//! 4. [`InsertGate`] + [`GateTimer`]: a cooldown: at most one edit is
//!    accepted per timer interval.
//!
//! ## Quick start
//!
//! ```rust
//! use sign_compose::{Composer, ComposeLimits, DetectMode, InsertGate};
//! use sign_labels::Label;
//!
//! let gate = InsertGate::new();
//! let mut composer = Composer::new(ComposeLimits::default());
//!
//! composer.apply(&Label::from("h"), DetectMode::Static, &gate);
//! gate.open();                       // normally done by a GateTimer
//! composer.apply(&Label::from("i"), DetectMode::Static, &gate);
//! assert_eq!(composer.word(), "hi");
//! ```

pub mod mode;
pub mod gate;
pub mod predict;
pub mod model;
pub mod compose;

pub use mode::{AppMode, DetectMode, ModeController, transition};
pub use gate::{InsertGate, GateTimer, TimerSettings};
pub use predict::{Classifier, Prediction, PredictionGate, DEFAULT_THRESHOLD, UNKNOWN_LABEL};
pub use model::{DenseClassifier, DenseLayer, Activation, ModelError};
pub use compose::{Composer, ComposeLimits, Edit};
