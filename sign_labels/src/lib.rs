//! # sign_labels
//!
//! Everything that lives on disk next to a trained sign model:
//!
//! * the **label file**: one sign label per line, line number = class index
//!   ([`LabelSet`]);
//! * the **static dataset**: a CSV of `labelIndex,v0,…,v41` rows, one per
//!   captured hand pose ([`DatasetWriter`], [`count_occurrences`],
//!   [`read_samples`]);
//! * the **dynamic dataset**: a directory per label holding fixed-length
//!   landmark sequences ([`SequenceRecorder`], [`count_sequences`]).
//!
//! It also defines the control vocabulary: labels such as `delete-word` or
//! `commit-word-to-sentence` that edit text instead of being typed
//! ([`ControlLabel`]).

pub mod labels;
pub mod dataset;
pub mod sequence;
pub mod cursor;

pub use labels::{Label, LabelSet, ControlLabel, LabelError};
pub use dataset::{DatasetWriter, Sample, count_occurrences, read_samples};
pub use sequence::{SequenceRecorder, count_sequences};
pub use cursor::LabelCursor;
