//! # sign_demo
//!
//! The windowed sign-language demo built on [`sign_compose`].
//!
//! ## Keys
//!
//! | Key | Action |
//! |---|---|
//! | `f` | Free camera |
//! | `s` / `d` | Save static / dynamic samples |
//! | `l` / `w` | Detect letters / words |
//! | `e` | Show or hide landmarks |
//! | `<` `>` | Pick the label to record (save modes) |
//! | `c` | Capture a sample (save modes) |
//! | `q` | Quit |
//!
//! In the default build the hand tracker is simulated: arrow keys step
//! through the recorded static dataset and `Space` hides or shows the hand.

pub mod config;
pub mod error;
pub mod tracker;
pub mod visualizer;
pub mod app;
