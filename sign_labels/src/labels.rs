//! Label files and the control-label vocabulary.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

// ════════════════════════════════════════════════════════════════════════════
// LabelError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum LabelError {
    /// The label file is missing.  Nothing can be composed without labels.
    #[error("label file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("label file {} contains no labels", .0.display())]
    Empty(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LabelError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        LabelError::Io { path: path.to_path_buf(), source }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Label
// ════════════════════════════════════════════════════════════════════════════

/// A recognisable sign.  Either literal text (`"a"`, `"hello"`) or one of the
/// [`ControlLabel`] commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(s: impl Into<String>) -> Self { Label(s.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    /// The editing command this label stands for, if any.
    pub fn control(&self) -> Option<ControlLabel> { ControlLabel::parse(&self.0) }

    pub fn is_control(&self) -> bool { self.control().is_some() }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.pad(&self.0) }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self { Label(s.to_string()) }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlLabel
// ════════════════════════════════════════════════════════════════════════════

/// Labels that trigger an editing command rather than inserting text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlLabel {
    /// Remove the last character of the active word.
    DeleteLetter,
    /// Clear the active word.
    DeleteWord,
    /// Move the sentence selection one word to the left.
    NavigateLeft,
    /// Move the sentence selection one word to the right.
    NavigateRight,
    /// Remove the selected word from the sentence.
    DeleteWordFromSentence,
    /// Clear the whole sentence.
    DeleteSentence,
    /// Move the active word onto the end of the sentence.
    CommitWord,
}

impl ControlLabel {
    pub const ALL: [ControlLabel; 7] = [
        ControlLabel::DeleteLetter,
        ControlLabel::DeleteWord,
        ControlLabel::NavigateLeft,
        ControlLabel::NavigateRight,
        ControlLabel::DeleteWordFromSentence,
        ControlLabel::DeleteSentence,
        ControlLabel::CommitWord,
    ];

    /// Canonical spelling used in label files.
    pub fn name(self) -> &'static str {
        match self {
            ControlLabel::DeleteLetter           => "delete-letter",
            ControlLabel::DeleteWord             => "delete-word",
            ControlLabel::NavigateLeft           => "navigate-left",
            ControlLabel::NavigateRight          => "navigate-right",
            ControlLabel::DeleteWordFromSentence => "delete-word-from-sentence",
            ControlLabel::DeleteSentence         => "delete-sentence",
            ControlLabel::CommitWord             => "commit-word-to-sentence",
        }
    }

    /// Recognise a control label.  `_` and `-` are interchangeable, case is
    /// ignored, and the older label-file spellings are still accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let label = match key.as_str() {
            "delete-letter"
            | "delete-letter-from-word"
            | "delete-letter-from-active-word" => ControlLabel::DeleteLetter,
            "delete-word"
            | "delete-active-word"             => ControlLabel::DeleteWord,
            "navigate-left" | "left" | "down"  => ControlLabel::NavigateLeft,
            "navigate-right" | "right" | "up"  => ControlLabel::NavigateRight,
            "delete-word-from-sentence"        => ControlLabel::DeleteWordFromSentence,
            "delete-sentence"                  => ControlLabel::DeleteSentence,
            "commit-word-to-sentence"
            | "commit-word"
            | "add-word-to-sentence"           => ControlLabel::CommitWord,
            _ => return None,
        };
        Some(label)
    }

    /// Navigation only matters while selecting inside the sentence.
    pub fn is_navigation(self) -> bool {
        matches!(self, ControlLabel::NavigateLeft | ControlLabel::NavigateRight)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LabelSet
// ════════════════════════════════════════════════════════════════════════════

/// The ordered labels a classifier was trained on.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Read one label per line.  Surrounding whitespace and blank lines are
    /// dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LabelError::NotFound(path.to_path_buf()),
            _ => LabelError::io(path, e),
        })?;

        let set = LabelSet::from_lines(&text);
        if set.is_empty() {
            return Err(LabelError::Empty(path.to_path_buf()));
        }
        info!("loaded {} labels from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn from_lines(text: &str) -> Self {
        let labels = text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Label::from)
            .collect();
        LabelSet { labels }
    }

    pub fn new(labels: Vec<Label>) -> Self { LabelSet { labels } }

    pub fn get(&self, index: usize) -> Option<&Label> { self.labels.get(index) }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.as_str() == label)
    }

    pub fn len(&self) -> usize { self.labels.len() }

    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Label> { self.labels.iter() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
