//! The composition state machine: active word, sentence, and sentence
//! cursor.
//!
//! Each accepted label is matched against these rules, first match wins:
//!
//! | # | Label | Precondition | Effect |
//! |---|---|---|---|
//! | 1 | `navigate-left` / `navigate-right` | word non-empty | ignored |
//! | 2 | `delete-letter` | word non-empty | pop last character |
//! | 3 | `delete-word` | none | clear word |
//! | 4 | `navigate-left` / `navigate-right` | word empty, sentence non-empty | move cursor, uppercase selection |
//! | 5 | `delete-word-from-sentence` | word empty, cursor set | remove selected word |
//! | 6 | `delete-sentence` | none | clear sentence and cursor |
//! | 7 | `commit-word-to-sentence` | word non-empty, fits | move word into sentence |
//! | 8 | any other label | fits | append to word |
//!
//! A control label whose precondition fails does nothing; it is never
//! appended as text.  Any edit that happens closes the [`InsertGate`].

use serde::{Deserialize, Serialize};
use sign_labels::{ControlLabel, Label};
use tracing::debug;

use crate::gate::InsertGate;
use crate::mode::DetectMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeLimits {
    /// Characters allowed in the active word.
    pub max_word_length:     usize,
    /// Characters allowed in the sentence.
    pub max_sentence_length: usize,
}

impl Default for ComposeLimits {
    fn default() -> Self {
        ComposeLimits { max_word_length: 30, max_sentence_length: 60 }
    }
}

/// What an accepted label did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    DeleteLetter(char),
    DeleteWord,
    SelectWord(usize),
    DeleteWordFromSentence(String),
    DeleteSentence,
    CommitWord(String),
    Append(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Composer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composer {
    word:     String,
    sentence: String,
    cursor:   Option<usize>,
    limits:   ComposeLimits,
}

impl Composer {
    pub fn new(limits: ComposeLimits) -> Self {
        Composer { word: String::new(), sentence: String::new(), cursor: None, limits }
    }

    pub fn word(&self)     -> &str { &self.word }
    pub fn sentence(&self) -> &str { &self.sentence }

    /// Index of the selected word in the whitespace-split sentence.
    pub fn cursor(&self) -> Option<usize> { self.cursor }

    pub fn limits(&self) -> ComposeLimits { self.limits }

    /// Apply one accepted label.  Does nothing while `gate` is closed;
    /// otherwise closes it if, and only if, the label changed something.
    pub fn apply(&mut self, label: &Label, mode: DetectMode, gate: &InsertGate) -> Option<Edit> {
        if !gate.is_open() {
            return None;
        }
        let edit = self.edit(label, mode)?;
        gate.close();
        debug!(?edit, word = %self.word, sentence = %self.sentence, "composition edit");
        Some(edit)
    }

    fn edit(&mut self, label: &Label, mode: DetectMode) -> Option<Edit> {
        let control = match label.control() {
            Some(c) => c,
            None    => return self.append(label, mode),
        };
        match control {
            c if c.is_navigation() && !self.word.is_empty() => None,
            ControlLabel::DeleteLetter => self.word.pop().map(Edit::DeleteLetter),
            ControlLabel::DeleteWord => {
                self.word.clear();
                Some(Edit::DeleteWord)
            }
            ControlLabel::NavigateLeft  => self.navigate(false),
            ControlLabel::NavigateRight => self.navigate(true),
            ControlLabel::DeleteWordFromSentence if self.word.is_empty() => self.delete_selected(),
            ControlLabel::DeleteWordFromSentence => None,
            ControlLabel::DeleteSentence => {
                self.sentence.clear();
                self.cursor = None;
                Some(Edit::DeleteSentence)
            }
            ControlLabel::CommitWord => self.commit(),
        }
    }

    // ── rule 4 ──────────────────────────────────────────────────────────────

    fn navigate(&mut self, forward: bool) -> Option<Edit> {
        let mut words = self.words();
        if words.is_empty() {
            return None;
        }
        let last = words.len() - 1;
        let next = match self.cursor {
            None                => 0,
            Some(i) if forward  => (i + 1).min(last),
            Some(i)             => i.saturating_sub(1).min(last),
        };
        if let Some(old) = self.cursor.filter(|&i| i <= last) {
            words[old] = words[old].to_lowercase();
        }
        words[next] = words[next].to_uppercase();

        let sentence = words.join(" ");
        if !self.fits_sentence(&sentence) {
            return None;
        }
        self.sentence = sentence;
        self.cursor = Some(next);
        Some(Edit::SelectWord(next))
    }

    // ── rule 5 ──────────────────────────────────────────────────────────────

    fn delete_selected(&mut self) -> Option<Edit> {
        let mut words = self.words();
        let index = self.cursor.filter(|&i| i < words.len())?;
        let removed = words.remove(index);
        self.sentence = words.join(" ");
        self.cursor = None;
        Some(Edit::DeleteWordFromSentence(removed))
    }

    // ── rule 7 ──────────────────────────────────────────────────────────────

    fn commit(&mut self) -> Option<Edit> {
        if self.word.is_empty() {
            return None;
        }
        let base = match self.cursor {
            Some(i) => {
                let mut words = self.words();
                if let Some(w) = words.get_mut(i) {
                    *w = w.to_lowercase();
                }
                words.join(" ")
            }
            None => self.sentence.clone(),
        };

        let mut word = self.word.clone();
        if !word.ends_with(' ') {
            word.push(' ');
        }
        let sentence = if base.is_empty() || base.ends_with(char::is_whitespace) {
            format!("{}{}", base, word)
        } else {
            format!("{} {}", base, word)
        };
        if !self.fits_sentence(&sentence) {
            return None;
        }

        self.sentence = sentence;
        self.word.clear();
        self.cursor = None;
        Some(Edit::CommitWord(word.trim_end().to_string()))
    }

    // ── rule 8 ──────────────────────────────────────────────────────────────

    fn append(&mut self, label: &Label, mode: DetectMode) -> Option<Edit> {
        let unit = match mode {
            DetectMode::Static  => label.as_str().to_string(),
            DetectMode::Dynamic => format!("{} ", label.as_str()),
        };
        if self.word.chars().count() + unit.chars().count() > self.limits.max_word_length {
            return None;
        }
        self.word.push_str(&unit);
        Some(Edit::Append(unit))
    }

    fn words(&self) -> Vec<String> {
        self.sentence.split_whitespace().map(str::to_string).collect()
    }

    fn fits_sentence(&self, s: &str) -> bool {
        s.chars().count() <= self.limits.max_sentence_length
    }
}

impl Default for Composer {
    fn default() -> Self { Self::new(ComposeLimits::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const STATIC:  DetectMode = DetectMode::Static;
    const DYNAMIC: DetectMode = DetectMode::Dynamic;

    fn l(s: &str) -> Label { Label::from(s) }

    /// Apply with a freshly opened gate, as if the timer had fired.
    fn tick(c: &mut Composer, label: &str, mode: DetectMode) -> Option<Edit> {
        let gate = InsertGate::new();
        c.apply(&l(label), mode, &gate)
    }

    fn with_text(word: &str, sentence: &str) -> Composer {
        Composer {
            word:     word.to_string(),
            sentence: sentence.to_string(),
            ..Composer::default()
        }
    }

    // ── scenarios ──────────────────────────────────────────────────────────

    #[test]
    fn letters_build_a_word() {
        let mut c = Composer::default();
        tick(&mut c, "h", STATIC);
        tick(&mut c, "i", STATIC);
        assert_eq!(c.word(), "hi");
    }

    #[test]
    fn commit_moves_word_into_empty_sentence() {
        let mut c = with_text("hi", "");
        assert_eq!(tick(&mut c, "commit-word-to-sentence", STATIC), Some(Edit::CommitWord("hi".into())));
        assert_eq!(c.sentence(), "hi ");
        assert_eq!(c.word(), "");
        assert_eq!(c.cursor(), None);
    }

    #[test]
    fn first_navigation_selects_first_word() {
        let mut c = with_text("", "hi there");
        assert_eq!(tick(&mut c, "navigate-right", STATIC), Some(Edit::SelectWord(0)));
        assert_eq!(c.cursor(), Some(0));
        assert_eq!(c.sentence(), "HI there");
    }

    // ── gate discipline ────────────────────────────────────────────────────

    #[test]
    fn closed_gate_blocks_every_label() {
        let gate = InsertGate::new();
        let mut c = Composer::default();
        assert!(c.apply(&l("a"), STATIC, &gate).is_some());
        assert!(!gate.is_open());
        for label in ["b", "delete-word", "delete-sentence", "commit-word-to-sentence"] {
            assert_eq!(c.apply(&l(label), STATIC, &gate), None);
        }
        assert_eq!(c.word(), "a");
    }

    #[test]
    fn no_op_control_labels_leave_gate_open() {
        let gate = InsertGate::new();
        let mut c = Composer::default();
        for label in ["delete-letter", "navigate-left", "delete-word-from-sentence", "commit-word-to-sentence"] {
            assert_eq!(c.apply(&l(label), STATIC, &gate), None, "{}", label);
            assert!(gate.is_open(), "{}", label);
        }
        assert_eq!(c, Composer::default());
    }

    // ── word editing ───────────────────────────────────────────────────────

    #[test]
    fn static_letters_grow_word_by_one() {
        let mut c = Composer::default();
        for (n, letter) in ["a", "b", "c", "d"].iter().enumerate() {
            tick(&mut c, letter, STATIC);
            assert_eq!(c.word().chars().count(), n + 1);
        }
    }

    #[test]
    fn dynamic_words_carry_trailing_space() {
        let mut c = Composer::default();
        tick(&mut c, "hello", DYNAMIC);
        assert_eq!(c.word(), "hello ");
        tick(&mut c, "you", DYNAMIC);
        assert_eq!(c.word(), "hello you ");
    }

    #[test]
    fn word_stops_growing_at_the_limit() {
        let mut c = Composer::new(ComposeLimits { max_word_length: 3, max_sentence_length: 60 });
        for letter in ["a", "b", "c"] { tick(&mut c, letter, STATIC); }
        assert_eq!(tick(&mut c, "d", STATIC), None);
        assert_eq!(c.word(), "abc");

        let mut d = Composer::new(ComposeLimits { max_word_length: 6, max_sentence_length: 60 });
        tick(&mut d, "yes", DYNAMIC);
        assert_eq!(tick(&mut d, "no", DYNAMIC), None);
        assert_eq!(d.word(), "yes ");
    }

    #[test]
    fn delete_letter_pops_last_char() {
        let mut c = with_text("héllo", "");
        assert_eq!(tick(&mut c, "delete-letter", STATIC), Some(Edit::DeleteLetter('o')));
        assert_eq!(c.word(), "héll");
    }

    #[test]
    fn delete_word_is_idempotent() {
        let mut c = with_text("abc", "keep ");
        tick(&mut c, "delete-word", STATIC);
        let once = c.clone();
        assert_eq!(tick(&mut c, "delete-word", STATIC), Some(Edit::DeleteWord));
        assert_eq!(c, once);
        assert_eq!(c.word(), "");
        assert_eq!(c.sentence(), "keep ");
    }

    #[test]
    fn legacy_control_names_are_recognised() {
        let mut c = with_text("ab", "");
        tick(&mut c, "delete_letter_from_active_word", STATIC);
        assert_eq!(c.word(), "a");
        tick(&mut c, "add_word_to_sentence", STATIC);
        assert_eq!(c.sentence(), "a ");
    }

    // ── sentence navigation ────────────────────────────────────────────────

    #[test]
    fn navigation_is_suppressed_mid_word() {
        let mut c = with_text("x", "hi there");
        assert_eq!(tick(&mut c, "navigate-right", STATIC), None);
        assert_eq!(c.sentence(), "hi there");
        assert_eq!(c.cursor(), None);
        assert_eq!(c.word(), "x");
    }

    #[test]
    fn navigation_moves_and_clamps() {
        let mut c = with_text("", "one two three");
        tick(&mut c, "navigate-right", STATIC);
        tick(&mut c, "navigate-right", STATIC);
        assert_eq!(c.sentence(), "one TWO three");
        tick(&mut c, "navigate-right", STATIC);
        tick(&mut c, "navigate-right", STATIC);
        assert_eq!(c.cursor(), Some(2));
        assert_eq!(c.sentence(), "one two THREE");
        for _ in 0..4 { tick(&mut c, "navigate-left", STATIC); }
        assert_eq!(c.cursor(), Some(0));
        assert_eq!(c.sentence(), "ONE two three");
    }

    #[test]
    fn left_from_nothing_selects_first_word() {
        let mut c = with_text("", "a b");
        tick(&mut c, "navigate-left", STATIC);
        assert_eq!(c.cursor(), Some(0));
        assert_eq!(c.sentence(), "A b");
    }

    #[test]
    fn navigation_on_empty_sentence_is_a_no_op() {
        let mut c = Composer::default();
        assert_eq!(tick(&mut c, "navigate-right", STATIC), None);
        assert_eq!(c.cursor(), None);
    }

    // ── sentence editing ───────────────────────────────────────────────────

    #[test]
    fn delete_selected_word() {
        let mut c = with_text("", "one two three");
        tick(&mut c, "navigate-right", STATIC);
        tick(&mut c, "navigate-right", STATIC);
        assert_eq!(
            tick(&mut c, "delete-word-from-sentence", STATIC),
            Some(Edit::DeleteWordFromSentence("TWO".into()))
        );
        assert_eq!(c.sentence(), "one three");
        assert_eq!(c.cursor(), None);
    }

    #[test]
    fn delete_from_sentence_needs_a_selection_and_empty_word() {
        let mut c = with_text("", "one two");
        assert_eq!(tick(&mut c, "delete-word-from-sentence", STATIC), None);
        tick(&mut c, "navigate-right", STATIC);
        c.word.push('z');
        assert_eq!(tick(&mut c, "delete-word-from-sentence", STATIC), None);
        assert_eq!(c.sentence(), "ONE two");
    }

    #[test]
    fn commit_then_delete_restores_sentence() {
        let mut c = with_text("", "hi ");
        let before: Vec<String> = c.sentence().split_whitespace().map(str::to_string).collect();

        c.word = "there".into();
        tick(&mut c, "commit-word-to-sentence", STATIC);
        assert_eq!(c.sentence(), "hi there ");
        tick(&mut c, "navigate-right", STATIC);
        tick(&mut c, "navigate-right", STATIC);
        tick(&mut c, "delete-word-from-sentence", STATIC);

        let after: Vec<String> = c.sentence().split_whitespace().map(str::to_string).collect();
        assert_eq!(after, before);
    }

    #[test]
    fn commit_clears_selection_highlight() {
        let mut c = with_text("", "hi there");
        tick(&mut c, "navigate-right", STATIC);
        c.word = "you".into();
        tick(&mut c, "commit-word-to-sentence", STATIC);
        assert_eq!(c.sentence(), "hi there you ");
        assert_eq!(c.cursor(), None);
    }

    #[test]
    fn dynamic_word_commits_without_doubling_space() {
        let mut c = Composer::default();
        tick(&mut c, "good", DYNAMIC);
        tick(&mut c, "morning", DYNAMIC);
        tick(&mut c, "commit-word-to-sentence", DYNAMIC);
        assert_eq!(c.sentence(), "good morning ");
    }

    #[test]
    fn commit_that_would_overflow_is_ignored() {
        let mut c = Composer::new(ComposeLimits { max_word_length: 30, max_sentence_length: 8 });
        c.sentence = "hello ".into();
        c.word = "world".into();
        let gate = InsertGate::new();
        assert_eq!(c.apply(&l("commit-word-to-sentence"), STATIC, &gate), None);
        assert!(gate.is_open());
        assert_eq!(c.word(), "world");
        assert_eq!(c.sentence(), "hello ");
    }

    #[test]
    fn delete_sentence_resets_cursor() {
        let mut c = with_text("w", "a b c");
        c.cursor = Some(1);
        assert_eq!(tick(&mut c, "delete-sentence", STATIC), Some(Edit::DeleteSentence));
        assert_eq!(c.sentence(), "");
        assert_eq!(c.cursor(), None);
        assert_eq!(c.word(), "w");
    }

    #[test]
    fn limits_parse_with_defaults() {
        let lim: ComposeLimits = serde_json::from_str(r#"{ "max_word_length": 12 }"#).unwrap();
        assert_eq!(lim, ComposeLimits { max_word_length: 12, max_sentence_length: 60 });
    }
}
