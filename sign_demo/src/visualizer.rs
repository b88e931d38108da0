//! Software-rendered window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ mode title                           save label / gate state │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │              ┌ prediction ─┐                                 │
//! │              │  landmarks  │        (camera view)            │
//! │              └─────────────┘                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │ WORD:     ...                                                │
//! │ SENTENCE: ...                                                │
//! │ key legend                                  sim hand status  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use hand_landmarks::{HandLandmarks, Landmark, CONNECTIONS};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use sign_compose::Prediction;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::tracker::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 960;
pub const WIN_H:     usize = 600;
const STATUS_H:      usize = 32;
const TEXT_H:        usize = 104;
const VIEW_Y:        usize = STATUS_H;
const VIEW_H:        usize = WIN_H - STATUS_H - TEXT_H;
const TEXT_Y:        usize = WIN_H - TEXT_H;
const BOX_PAD:       usize = 18;
const BG_COLOR:      u32   = 0xFF1A1A2E;
const BAR_BG:        u32   = 0xFF0F3460;
const TEXT_BG:       u32   = 0xFF16213E;
const BONE_COLOR:    u32   = 0xFFEEEEEE;
const JOINT_COLOR:   u32   = 0xFFE94560;
const BOX_COLOR:     u32   = 0xFF00CC66;
const UNKNOWN_COLOR: u32   = 0xFFCC3333;
const LABEL_COLOR:   u32   = 0xFFFFD700;
const SELECT_BG:     u32   = 0xFF533483;

/// Everything drawn in one frame.
pub struct Scene<'a> {
    pub title:          &'a str,
    /// Right-hand side of the status bar.
    pub detail:         &'a str,
    pub hand:           Option<&'a HandLandmarks>,
    pub show_landmarks: bool,
    pub prediction:     &'a Prediction,
    /// Word and sentence are shown in the detect modes only.
    pub show_text:      bool,
    pub word:           &'a str,
    pub sentence:       &'a str,
    /// Word of `sentence` picked by navigation, highlighted when drawn.
    pub selected:       Option<usize>,
    pub tracker_status: &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "SIGN",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Keys pressed since the last frame.  Arrow keys and `Space` drive the
    /// simulated hand and are forwarded to it rather than returned.
    pub fn poll_input(&mut self) -> Vec<char> {
        let mut keys = Vec::new();
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            let sim = match key {
                Key::Right | Key::Down => Some(SimInput::NextSample),
                Key::Left  | Key::Up   => Some(SimInput::PrevSample),
                Key::Space             => Some(SimInput::ToggleHand),
                _                      => None,
            };
            match sim {
                Some(input) => { let _ = self.sim_tx.send(input); }
                None => keys.extend(key_char(key)),
            }
        }
        keys
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene<'_>) {
        self.buf.fill(BG_COLOR);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, 0, WIN_W, STATUS_H, BAR_BG);
        self.draw_label(scene.title, 10, 9, 0xFFEEEEEE, 3);
        let dx = WIN_W.saturating_sub(text_width(scene.detail, 2) + 10);
        self.draw_label(scene.detail, dx, 11, LABEL_COLOR, 2);

        // ── Hand ──────────────────────────────────────────────────────────
        if let Some(hand) = scene.hand {
            if scene.show_landmarks {
                self.draw_landmarks(hand);
            }
            if scene.show_text {
                self.draw_hand_box(hand, scene.prediction);
            }
        }

        // ── Word / sentence ───────────────────────────────────────────────
        self.fill_rect(0, TEXT_Y, WIN_W, TEXT_H, TEXT_BG);
        if scene.show_text {
            self.draw_label("WORD:", 10, TEXT_Y + 10, 0xFF888888, 3);
            self.draw_label(scene.word, 130, TEXT_Y + 10, 0xFFFFFFFF, 3);
            self.draw_label("SENTENCE:", 10, TEXT_Y + 38, 0xFF888888, 3);
            self.draw_label(scene.sentence, 130, TEXT_Y + 38, 0xFFFFFFFF, 3);
            if let Some((start, len)) = word_span(scene.sentence, scene.selected) {
                let x = 130 + start * 12;
                let word: String = scene.sentence.chars().skip(start).take(len).collect();
                self.fill_rect(x.saturating_sub(2), TEXT_Y + 35, text_width(&word, 3) + 2, 21, SELECT_BG);
                self.draw_label(&word, x, TEXT_Y + 38, LABEL_COLOR, 3);
            }
        }

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "f=free s=save-static d=save-dynamic l=letters w=words e=landmarks </>=label c=capture q=quit",
            10, WIN_H - 16, 0xFF888888, 1,
        );
        let tx = WIN_W.saturating_sub(text_width(scene.tracker_status, 1) + 10);
        self.draw_label(scene.tracker_status, tx, WIN_H - 28, 0xFF888888, 1);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Hand ──────────────────────────────────────────────────────────────

    fn draw_landmarks(&mut self, hand: &HandLandmarks) {
        let points = hand.points();
        for &(a, b) in CONNECTIONS.iter() {
            let (x0, y0) = to_screen(points[a]);
            let (x1, y1) = to_screen(points[b]);
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }
        for p in points {
            let (x, y) = to_screen(*p);
            self.fill_square(x, y, 3, JOINT_COLOR);
        }
    }

    fn draw_hand_box(&mut self, hand: &HandLandmarks, prediction: &Prediction) {
        let b = hand.bounds();
        let (x0, y0) = to_screen(Landmark::new(b.min_x, b.min_y));
        let (x1, y1) = to_screen(Landmark::new(b.max_x, b.max_y));
        let x = (x0 - BOX_PAD as isize).max(0) as usize;
        let y = (y0 - BOX_PAD as isize).max(VIEW_Y as isize) as usize;
        let w = (x1 - x0) as usize + 2 * BOX_PAD;
        let h = (y1 - y0) as usize + 2 * BOX_PAD;

        let color = match prediction {
            Prediction::Unknown { .. } => UNKNOWN_COLOR,
            _ => BOX_COLOR,
        };
        self.draw_border(x, y, w, h, color);
        self.draw_border(x + 1, y + 1, w.saturating_sub(2), h.saturating_sub(2), color);

        let text = prediction.to_string();
        if !text.is_empty() {
            let ty = y.saturating_sub(20).max(VIEW_Y + 2);
            self.fill_rect(x, ty - 2, text_width(&text, 3) + 8, 19, color);
            self.draw_label(&text, x + 4, ty + 1, 0xFF000000, 3);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(WIN_W) {
            self.set_pixel(col, y,         color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(WIN_H) {
            self.set_pixel(x,         row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn put(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn fill_square(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                self.put(x, y, color);
            }
        }
    }

    /// Bresenham, two pixels thick.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.put(x, y, color);
            self.put(x + 1, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// 3×5 bitmap font, each lit bit drawn as a `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 4 * scale > WIN_W { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
        }
    }
}

/// Normalised frame coordinates to window pixels inside the camera view.
fn to_screen(p: Landmark) -> (isize, isize) {
    let x = (p.x.clamp(0.0, 1.0) * (WIN_W - 1) as f32) as isize;
    let y = (p.y.clamp(0.0, 1.0) * (VIEW_H - 1) as f32) as isize + VIEW_Y as isize;
    (x, y)
}

fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * 4 * scale
}

/// Character offset and length of the `selected`-th whitespace-separated
/// word of `sentence`.
fn word_span(sentence: &str, selected: Option<usize>) -> Option<(usize, usize)> {
    let target = selected?;
    let mut word = 0;
    let mut start = None;
    for (i, c) in sentence.chars().chain(std::iter::once(' ')).enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                if word == target {
                    return Some((s, i - s));
                }
                word += 1;
                start = None;
            }
            _ => {}
        }
    }
    None
}

fn key_char(key: Key) -> Option<char> {
    let c = match key {
        Key::A => 'a', Key::B => 'b', Key::C => 'c', Key::D => 'd', Key::E => 'e',
        Key::F => 'f', Key::G => 'g', Key::H => 'h', Key::I => 'i', Key::J => 'j',
        Key::K => 'k', Key::L => 'l', Key::M => 'm', Key::N => 'n', Key::O => 'o',
        Key::P => 'p', Key::Q => 'q', Key::R => 'r', Key::S => 's', Key::T => 't',
        Key::U => 'u', Key::V => 'v', Key::W => 'w', Key::X => 'x', Key::Y => 'y',
        Key::Z => 'z',
        // unshifted keys of `<` and `>`
        Key::Comma  => '<',
        Key::Period => '>',
        _ => return None,
    };
    Some(c)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_lowercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_into_camera_view() {
        assert_eq!(to_screen(Landmark::new(0.0, 0.0)), (0, VIEW_Y as isize));
        let (x, y) = to_screen(Landmark::new(1.0, 1.0));
        assert_eq!(x, (WIN_W - 1) as isize);
        assert_eq!(y, (VIEW_Y + VIEW_H - 1) as isize);
        assert!((y as usize) < TEXT_Y);
    }

    #[test]
    fn out_of_frame_points_are_clamped() {
        assert_eq!(to_screen(Landmark::new(-0.5, 2.0)), to_screen(Landmark::new(0.0, 1.0)));
    }

    #[test]
    fn mode_and_label_keys_map_to_chars() {
        assert_eq!(key_char(Key::L), Some('l'));
        assert_eq!(key_char(Key::Comma), Some('<'));
        assert_eq!(key_char(Key::Period), Some('>'));
        assert_eq!(key_char(Key::Enter), None);
    }

    #[test]
    fn selected_word_span() {
        assert_eq!(word_span("HI there", Some(0)), Some((0, 2)));
        assert_eq!(word_span("hi THERE ", Some(1)), Some((3, 5)));
        assert_eq!(word_span("hi there", Some(2)), None);
        assert_eq!(word_span("hi there", None), None);
        assert_eq!(word_span("", Some(0)), None);
    }
}
