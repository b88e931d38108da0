//! Application modes and the key bindings that switch between them.
//!
//! | Key | Effect |
//! |---|---|
//! | `f` | Free camera |
//! | `s` | Save static landmarks (letters) |
//! | `d` | Save dynamic landmarks (words) |
//! | `l` | Detect static signs (letters) |
//! | `w` | Detect dynamic signs (words) |
//! | `q` | Quit |
//! | `e` | Show / hide landmarks |
//!
//! Any other key leaves everything unchanged.  `Quit` is terminal.

use tracing::info;

pub const TOGGLE_LANDMARKS_KEY: char = 'e';

// ════════════════════════════════════════════════════════════════════════════
// AppMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AppMode {
    #[default]
    Free,
    SaveStatic,
    SaveDynamic,
    DetectStatic,
    DetectDynamic,
    Quit,
}

/// The two modes in which signs are recognised and composed into text.
///
/// Static signs are letters appended as-is; dynamic signs are whole words
/// and carry a trailing space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectMode {
    Static,
    Dynamic,
}

impl AppMode {
    pub const ALL: [AppMode; 6] = [
        AppMode::Free,
        AppMode::SaveStatic,
        AppMode::SaveDynamic,
        AppMode::DetectStatic,
        AppMode::DetectDynamic,
        AppMode::Quit,
    ];

    /// The mode a key selects directly, if any.
    pub fn from_key(key: char) -> Option<AppMode> {
        match key {
            'f' => Some(AppMode::Free),
            's' => Some(AppMode::SaveStatic),
            'd' => Some(AppMode::SaveDynamic),
            'l' => Some(AppMode::DetectStatic),
            'w' => Some(AppMode::DetectDynamic),
            'q' => Some(AppMode::Quit),
            _   => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            AppMode::Free          => 'f',
            AppMode::SaveStatic    => 's',
            AppMode::SaveDynamic   => 'd',
            AppMode::DetectStatic  => 'l',
            AppMode::DetectDynamic => 'w',
            AppMode::Quit          => 'q',
        }
    }

    /// Status-bar title.
    pub fn title(self) -> &'static str {
        match self {
            AppMode::Free          => "Free Camera Mode",
            AppMode::SaveStatic    => "Save Static Landmarks Mode (letter)",
            AppMode::SaveDynamic   => "Save Dynamic Landmarks Mode (word)",
            AppMode::DetectStatic  => "Detect Static Signs Mode (letter)",
            AppMode::DetectDynamic => "Detect Dynamic Signs Mode (word)",
            AppMode::Quit          => "Quit Application",
        }
    }

    pub fn detect_mode(self) -> Option<DetectMode> {
        match self {
            AppMode::DetectStatic  => Some(DetectMode::Static),
            AppMode::DetectDynamic => Some(DetectMode::Dynamic),
            _ => None,
        }
    }

    pub fn is_detect(self) -> bool { self.detect_mode().is_some() }

    pub fn is_save(self) -> bool {
        matches!(self, AppMode::SaveStatic | AppMode::SaveDynamic)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transition function
// ════════════════════════════════════════════════════════════════════════════

/// `(mode, show_landmarks)` after pressing `key`.
pub fn transition(mode: AppMode, show_landmarks: bool, key: char) -> (AppMode, bool) {
    if mode == AppMode::Quit {
        return (mode, show_landmarks);
    }
    if key == TOGGLE_LANDMARKS_KEY {
        return (mode, !show_landmarks);
    }
    match AppMode::from_key(key) {
        Some(next) => (next, show_landmarks),
        None       => (mode, show_landmarks),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ModeController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeController {
    mode:           AppMode,
    show_landmarks: bool,
}

impl ModeController {
    pub fn new() -> Self { Self::default() }

    pub fn mode(&self) -> AppMode { self.mode }

    pub fn show_landmarks(&self) -> bool { self.show_landmarks }

    /// Apply one key press.  Returns the new mode when it changed.
    pub fn on_key(&mut self, key: char) -> Option<AppMode> {
        let (mode, show) = transition(self.mode, self.show_landmarks, key);
        let changed = mode != self.mode;
        if show != self.show_landmarks {
            info!("landmarks {}", if show { "shown" } else { "hidden" });
        }
        if changed {
            info!("mode: {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.show_landmarks = show;
        changed.then_some(mode)
    }

    pub fn should_quit(&self) -> bool { self.mode == AppMode::Quit }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_free_with_landmarks_hidden() {
        let c = ModeController::new();
        assert_eq!(c.mode(), AppMode::Free);
        assert!(!c.show_landmarks());
    }

    #[test]
    fn save_save_detect_sequence_ends_in_detect_static() {
        let mut c = ModeController::new();
        for k in ['s', 'd', 'l'] { c.on_key(k); }
        assert_eq!(c.mode(), AppMode::DetectStatic);
        assert!(!c.show_landmarks());
    }

    #[test]
    fn every_mode_key_selects_its_mode() {
        for m in AppMode::ALL {
            assert_eq!(transition(AppMode::Free, false, m.key()), (m, false));
            assert_eq!(AppMode::from_key(m.key()), Some(m));
        }
    }

    #[test]
    fn unknown_key_is_a_no_op() {
        assert_eq!(transition(AppMode::DetectDynamic, true, 'z'), (AppMode::DetectDynamic, true));
        let mut c = ModeController::new();
        assert_eq!(c.on_key('?'), None);
        assert_eq!(c.mode(), AppMode::Free);
    }

    #[test]
    fn landmark_toggle_keeps_mode() {
        let mut c = ModeController::new();
        c.on_key('l');
        assert_eq!(c.on_key('e'), None);
        assert!(c.show_landmarks());
        assert_eq!(c.mode(), AppMode::DetectStatic);
        c.on_key('e');
        assert!(!c.show_landmarks());
    }

    #[test]
    fn mode_change_persists_landmark_flag() {
        let mut c = ModeController::new();
        c.on_key('e');
        c.on_key('w');
        assert!(c.show_landmarks());
    }

    #[test]
    fn quit_is_terminal() {
        let mut c = ModeController::new();
        assert_eq!(c.on_key('q'), Some(AppMode::Quit));
        assert!(c.should_quit());
        for k in ['f', 'l', 'e', 's'] {
            assert_eq!(c.on_key(k), None);
        }
        assert_eq!(c.mode(), AppMode::Quit);
        assert!(!c.show_landmarks());
    }

    #[test]
    fn reentering_same_mode_reports_no_change() {
        let mut c = ModeController::new();
        assert_eq!(c.on_key('l'), Some(AppMode::DetectStatic));
        assert_eq!(c.on_key('l'), None);
    }

    #[test]
    fn detect_modes_map_to_detect_kinds() {
        assert_eq!(AppMode::DetectStatic.detect_mode(),  Some(DetectMode::Static));
        assert_eq!(AppMode::DetectDynamic.detect_mode(), Some(DetectMode::Dynamic));
        for m in [AppMode::Free, AppMode::SaveStatic, AppMode::SaveDynamic, AppMode::Quit] {
            assert!(!m.is_detect());
        }
        assert!(AppMode::SaveDynamic.is_save());
    }
}
