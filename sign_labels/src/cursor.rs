//! Which label the save modes are currently recording for.

/// Selection over a label set of fixed length.  Starts with nothing
/// selected; stepping is clamped to the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelCursor {
    selected: Option<usize>,
    len:      usize,
}

impl LabelCursor {
    pub fn new(len: usize) -> Self { LabelCursor { selected: None, len } }

    pub fn selected(&self) -> Option<usize> { self.selected }

    pub fn next(&mut self) {
        if self.len == 0 { return; }
        self.selected = Some(match self.selected {
            None    => 0,
            Some(i) => (i + 1).min(self.len - 1),
        });
    }

    /// Stepping back past the first label clears the selection.
    pub fn prev(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i)        => Some(i - 1),
        };
    }

    /// `>` and `<` step the cursor; returns whether the key was consumed.
    pub fn on_key(&mut self, key: char) -> bool {
        match key {
            '>' => { self.next(); true }
            '<' => { self.prev(); true }
            _   => false,
        }
    }
}
