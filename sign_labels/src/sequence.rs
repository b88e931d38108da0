//! The dynamic dataset: fixed-length landmark sequences, one file each,
//! grouped into a directory per label.
//!
//! ```text
//! <root>/
//!   hello/0.csv   30 rows of v0,…,v41
//!   hello/1.csv
//!   thanks/0.csv
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hand_landmarks::FeatureVector;
use tracing::{debug, info};

use crate::labels::{Label, LabelError, LabelSet};

/// Number of recorded sequences per label.  A label without a directory
/// simply has none.
pub fn count_sequences(root: impl AsRef<Path>, labels: &LabelSet) -> Result<Vec<usize>, LabelError> {
    let root = root.as_ref();
    labels.iter()
        .map(|label| count_files(&root.join(label.as_str())))
        .collect()
}

fn count_files(dir: &Path) -> Result<usize, LabelError> {
    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut n = 0;
            for entry in entries {
                let entry = entry.map_err(|e| LabelError::io(dir, e))?;
                if entry.path().is_file() { n += 1; }
            }
            Ok(n)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(LabelError::io(dir, e)),
    }
}

struct Recording {
    label:  Label,
    frames: Vec<FeatureVector>,
}

/// Collects `frames_per_sequence` consecutive poses after a capture trigger
/// and writes them out as one sequence file.
pub struct SequenceRecorder {
    root:                PathBuf,
    frames_per_sequence: usize,
    active:              Option<Recording>,
}

impl SequenceRecorder {
    pub fn new(root: impl Into<PathBuf>, frames_per_sequence: usize) -> Self {
        SequenceRecorder {
            root: root.into(),
            frames_per_sequence: frames_per_sequence.max(1),
            active: None,
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Begin a sequence for `label`.  Returns false if one is already running.
    pub fn start(&mut self, label: &Label) -> bool {
        if self.active.is_some() { return false; }
        debug!("sequence capture started for {}", label);
        self.active = Some(Recording {
            label:  label.clone(),
            frames: Vec::with_capacity(self.frames_per_sequence),
        });
        true
    }

    pub fn is_recording(&self) -> bool { self.active.is_some() }

    /// `(frames captured, frames per sequence)` while recording.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.active.as_ref().map(|r| (r.frames.len(), self.frames_per_sequence))
    }

    /// Drop a partial sequence without writing it.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("sequence capture cancelled");
        }
    }

    /// Add one frame.  When the sequence is full it is written and the path
    /// of the new file is returned.
    pub fn push(&mut self, features: &FeatureVector) -> Result<Option<PathBuf>, LabelError> {
        let full = match self.active.as_mut() {
            Some(rec) => {
                rec.frames.push(*features);
                rec.frames.len() >= self.frames_per_sequence
            }
            None => return Ok(None),
        };
        if !full { return Ok(None); }

        match self.active.take() {
            Some(rec) => self.write(rec).map(Some),
            None      => Ok(None),
        }
    }

    fn write(&self, rec: Recording) -> Result<PathBuf, LabelError> {
        let dir = self.root.join(rec.label.as_str());
        fs::create_dir_all(&dir).map_err(|e| LabelError::io(&dir, e))?;

        let path = dir.join(format!("{}.csv", count_files(&dir)?));
        let mut file = fs::File::create(&path).map_err(|e| LabelError::io(&path, e))?;
        for frame in &rec.frames {
            let row: Vec<String> = frame.iter().map(|v| v.to_string()).collect();
            writeln!(file, "{}", row.join(",")).map_err(|e| LabelError::io(&path, e))?;
        }
        info!("saved {}-frame sequence for {} to {}", rec.frames.len(), rec.label, path.display());
        Ok(path)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
