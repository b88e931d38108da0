//! The static landmark dataset: one CSV row per captured hand pose.
//!
//! Row format: `labelIndex,v0,v1,…,v41` where `v` is the wrist-relative
//! feature vector produced by [`hand_landmarks::normalize`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use hand_landmarks::{FeatureVector, FEATURE_LEN};
use tracing::{debug, warn};

use crate::labels::LabelError;

/// One parsed dataset row.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub label_index: usize,
    pub features:    FeatureVector,
}

// ════════════════════════════════════════════════════════════════════════════
// Reading
// ════════════════════════════════════════════════════════════════════════════

/// Open `path` for reading; `Ok(None)` if it does not exist yet.
fn open_optional(path: &Path) -> Result<Option<BufReader<File>>, LabelError> {
    match File::open(path) {
        Ok(f) => Ok(Some(BufReader::new(f))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LabelError::io(path, e)),
    }
}

/// Per-label sample counts of the dataset at `path`.
///
/// Returns `Ok(None)` when the dataset has not been created yet, which just
/// means nothing has been recorded.  Rows whose first field is not a label
/// index below `label_count` are skipped.
pub fn count_occurrences(path: impl AsRef<Path>, label_count: usize)
    -> Result<Option<Vec<usize>>, LabelError>
{
    let path = path.as_ref();
    let reader = match open_optional(path)? {
        Some(r) => r,
        None    => return Ok(None),
    };

    let mut counts = vec![0usize; label_count];
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LabelError::io(path, e))?;
        if line.trim().is_empty() { continue; }

        let first = line.split(',').next().unwrap_or("").trim();
        match first.parse::<usize>() {
            Ok(i) if i < label_count => counts[i] += 1,
            _ => warn!("{}:{}: skipping row with label field {:?}",
                       path.display(), lineno + 1, first),
        }
    }
    Ok(Some(counts))
}

/// Parse every well-formed row of the dataset at `path`.
///
/// `Ok(None)` when the file does not exist.  Rows with the wrong field count
/// or unparsable numbers are skipped.
pub fn read_samples(path: impl AsRef<Path>) -> Result<Option<Vec<Sample>>, LabelError> {
    let path = path.as_ref();
    let reader = match open_optional(path)? {
        Some(r) => r,
        None    => return Ok(None),
    };

    let mut samples = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LabelError::io(path, e))?;
        if line.trim().is_empty() { continue; }
        match parse_row(&line) {
            Some(s) => samples.push(s),
            None    => warn!("{}:{}: malformed dataset row", path.display(), lineno + 1),
        }
    }
    Ok(Some(samples))
}

fn parse_row(line: &str) -> Option<Sample> {
    let mut fields = line.split(',').map(str::trim);
    let label_index = fields.next()?.parse().ok()?;

    let mut features = [0.0f32; FEATURE_LEN];
    for slot in features.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }
    if fields.next().is_some() {
        return None;
    }
    Some(Sample { label_index, features })
}

fn format_row(label_index: usize, features: &FeatureVector) -> String {
    let mut row = label_index.to_string();
    for v in features {
        row.push(',');
        row.push_str(&v.to_string());
    }
    row
}

// ════════════════════════════════════════════════════════════════════════════
// Writing
// ════════════════════════════════════════════════════════════════════════════

/// Appends captured poses to the static dataset.
#[derive(Clone, Debug)]
pub struct DatasetWriter {
    path: PathBuf,
}

impl DatasetWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Append one row, creating the file and its parent directory if needed.
    pub fn append(&self, label_index: usize, features: &FeatureVector) -> Result<(), LabelError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| LabelError::io(parent, e))?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LabelError::io(&self.path, e))?;
        writeln!(file, "{}", format_row(label_index, features))
            .map_err(|e| LabelError::io(&self.path, e))?;
        debug!("appended sample for label {} to {}", label_index, self.path.display());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::scratch;

    fn ramp(offset: f32) -> FeatureVector {
        let mut v = [0.0f32; FEATURE_LEN];
        for (i, x) in v.iter_mut().enumerate() { *x = offset + i as f32 * 0.001; }
        v
    }

    #[test]
    fn missing_dataset_counts_as_none() {
        let dir = scratch("count_missing");
        assert_eq!(count_occurrences(dir.join("data.csv"), 4).unwrap(), None);
        assert_eq!(read_samples(dir.join("data.csv")).unwrap(), None);
    }

    #[test]
    fn counts_histogram_by_first_field() {
        let dir = scratch("count_hist");
        let path = dir.join("data.csv");
        fs::write(&path, "0,0.1\n2,0.2\n2,0.3\n\n").unwrap();
        assert_eq!(count_occurrences(&path, 3).unwrap(), Some(vec![1, 0, 2]));
    }

    #[test]
    fn out_of_range_and_garbage_rows_skipped() {
        let dir = scratch("count_skip");
        let path = dir.join("data.csv");
        fs::write(&path, "0,1\n7,1\nx,1\n1,1\n").unwrap();
        assert_eq!(count_occurrences(&path, 2).unwrap(), Some(vec![1, 1]));
    }

    #[test]
    fn appended_rows_are_counted_and_replayed() {
        let dir = scratch("append");
        let writer = DatasetWriter::new(dir.join("nested").join("data.csv"));
        writer.append(1, &ramp(0.0)).unwrap();
        writer.append(1, &ramp(0.5)).unwrap();
        writer.append(0, &ramp(-0.25)).unwrap();

        assert_eq!(count_occurrences(writer.path(), 2).unwrap(), Some(vec![1, 2]));

        let samples = read_samples(writer.path()).unwrap().unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].label_index, 0);
        assert!((samples[1].features[41] - ramp(0.5)[41]).abs() < 1e-6);
    }

    #[test]
    fn short_rows_are_not_samples() {
        assert!(parse_row("0,0.1,0.2").is_none());
        let full = format_row(3, &ramp(0.0));
        assert_eq!(full.split(',').count(), FEATURE_LEN + 1);
        assert!(parse_row(&format!("{},9", full)).is_none());
        assert_eq!(parse_row(&full).unwrap().label_index, 3);
    }
}
