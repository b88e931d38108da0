//! Top-level application session.
//!
//! `AppState` owns every component: the mode controller, the two prediction
//! gates, the composer with its insert gate and timer, and the dataset
//! writers used by the save modes.  Nothing lives in globals.
//!
//! Per frame the run loop feeds it the keys pressed and the hands the
//! tracker reported, then renders the resulting [`Scene`].

use std::sync::mpsc;

use hand_landmarks::{normalize, FeatureVector, HandLandmarks, HandTracker};
use sign_compose::{
    AppMode, Classifier, Composer, DenseClassifier, GateTimer, InsertGate, ModeController,
    Prediction, PredictionGate, TimerSettings,
};
use sign_labels::{
    count_occurrences, count_sequences, read_samples, DatasetWriter, LabelCursor, LabelSet,
    SequenceRecorder,
};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AppError, ConfigurationError};
use crate::tracker::SimHandSource;
use crate::visualizer::{Scene, Visualizer};

/// Key that records a sample in the save modes.
pub const CAPTURE_KEY: char = 'c';

type BoxedGate = PredictionGate<Box<dyn Classifier>>;

// ════════════════════════════════════════════════════════════════════════════
// Resources
// ════════════════════════════════════════════════════════════════════════════

/// A label set and the classifier trained on it.
pub struct ModeResources {
    pub labels:     LabelSet,
    pub classifier: Box<dyn Classifier>,
}

/// Everything loaded from disk before the session starts.
pub struct Resources {
    pub static_mode:  ModeResources,
    pub dynamic_mode: Option<ModeResources>,
}

impl Resources {
    /// Load labels and models.  Any missing file is fatal.
    pub fn load(settings: &Settings) -> Result<Self, ConfigurationError> {
        let static_mode = ModeResources {
            labels:     LabelSet::load(&settings.static_mode.labels)?,
            classifier: Box::new(DenseClassifier::load(&settings.static_mode.model)?),
        };
        let dynamic_mode = match &settings.dynamic_mode {
            Some(d) => Some(ModeResources {
                labels:     LabelSet::load(&d.labels)?,
                classifier: Box::new(DenseClassifier::load(&d.model)?),
            }),
            None => None,
        };
        Ok(Resources { static_mode, dynamic_mode })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── modes ────────────────────────────────────────────────────────────
    modes:          ModeController,

    // ── detection ────────────────────────────────────────────────────────
    static_gate:    BoxedGate,
    dynamic_gate:   Option<BoxedGate>,
    prediction:     Prediction,

    // ── composition ──────────────────────────────────────────────────────
    composer:       Composer,
    insert_gate:    InsertGate,
    timer:          Option<GateTimer>,
    timer_settings: TimerSettings,

    // ── capture ──────────────────────────────────────────────────────────
    dataset:        DatasetWriter,
    recorder:       SequenceRecorder,
    static_cursor:  LabelCursor,
    dynamic_cursor: LabelCursor,
    static_counts:  Vec<usize>,
    dynamic_counts: Vec<usize>,
    capture_requested: bool,

    // ── last frame ───────────────────────────────────────────────────────
    hand:           Option<HandLandmarks>,
    pub status:     String,
}

impl AppState {
    /// Fails when a classifier's output width does not match its labels.
    pub fn new(settings: &Settings, resources: Resources) -> Result<Self, ConfigurationError> {
        let threshold = settings.composition.threshold;
        let Resources { static_mode, dynamic_mode } = resources;

        let static_gate = PredictionGate::new(static_mode.classifier, static_mode.labels, threshold)?;
        let dynamic_gate = match dynamic_mode {
            Some(m) => Some(PredictionGate::new(m.classifier, m.labels, threshold)?),
            None    => None,
        };

        let dataset  = DatasetWriter::new(&settings.static_mode.dataset);
        let recorder = SequenceRecorder::new(settings.sequence_dir(), settings.capture.sequence_frames);

        let static_labels  = static_gate.labels();
        let dynamic_labels = dynamic_gate.as_ref().map_or(static_labels, |g| g.labels());
        let (static_len, dynamic_len) = (static_labels.len(), dynamic_labels.len());

        let static_counts = match count_occurrences(dataset.path(), static_len) {
            Ok(Some(c)) => c,
            Ok(None)    => vec![0; static_len],
            Err(e) => {
                warn!("counting static samples: {}", e);
                vec![0; static_len]
            }
        };
        let dynamic_counts = count_sequences(recorder.root(), dynamic_labels).unwrap_or_else(|e| {
            warn!("counting dynamic sequences: {}", e);
            vec![0; dynamic_len]
        });

        info!(
            static_labels  = static_len,
            dynamic_labels = dynamic_len,
            samples        = static_counts.iter().sum::<usize>(),
            sequences      = dynamic_counts.iter().sum::<usize>(),
            "session ready"
        );

        Ok(AppState {
            modes:          ModeController::new(),
            static_cursor:  LabelCursor::new(static_len),
            dynamic_cursor: LabelCursor::new(dynamic_len),
            static_gate,
            dynamic_gate,
            prediction:     Prediction::Skipped,
            composer:       Composer::new(settings.composition.limits()),
            insert_gate:    InsertGate::new(),
            timer:          None,
            timer_settings: settings.timer,
            dataset,
            recorder,
            static_counts,
            dynamic_counts,
            capture_requested: false,
            hand:           None,
            status:         String::new(),
        })
    }

    // ── labels per mode ──────────────────────────────────────────────────

    /// Word modes fall back to the letter classifier when no word model
    /// is configured.
    fn word_gate(&self) -> &BoxedGate {
        self.dynamic_gate.as_ref().unwrap_or(&self.static_gate)
    }

    fn dynamic_labels(&self) -> &LabelSet { self.word_gate().labels() }

    // ── keys ─────────────────────────────────────────────────────────────

    /// Process one key press.
    pub fn handle_key(&mut self, key: char) {
        let mode = self.modes.mode();
        if mode.is_save() {
            // the label is fixed until the sequence in progress is written
            if mode == AppMode::SaveDynamic && self.recorder.is_recording() && matches!(key, '<' | '>') {
                return;
            }
            let cursor = match mode {
                AppMode::SaveStatic => &mut self.static_cursor,
                _                   => &mut self.dynamic_cursor,
            };
            if cursor.on_key(key) {
                return;
            }
            if key == CAPTURE_KEY {
                self.capture_requested = true;
                return;
            }
        }

        if let Some(next) = self.modes.on_key(key) {
            self.on_mode_change(mode, next);
        }
    }

    fn on_mode_change(&mut self, from: AppMode, to: AppMode) {
        self.prediction = Prediction::Skipped;
        self.capture_requested = false;
        if from == AppMode::SaveDynamic {
            self.recorder.cancel();
        }

        if to.is_detect() {
            if self.timer.is_none() {
                self.timer = Some(GateTimer::spawn(self.insert_gate.clone(), self.timer_settings));
            }
        } else {
            self.stop_timer();
        }
        self.status = to.title().to_string();
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
            debug!("gate timer joined");
        }
    }

    // ── frames ───────────────────────────────────────────────────────────

    /// Run the pipeline for one frame.  Only the first hand is used.
    pub fn process_frame(&mut self, hands: &[HandLandmarks]) {
        let capture = std::mem::take(&mut self.capture_requested);
        self.hand = hands.first().cloned();

        let Some(hand) = self.hand.as_ref() else {
            self.prediction = Prediction::Skipped;
            return;
        };
        let features = normalize(hand);
        let mode = self.modes.mode();

        match mode {
            AppMode::SaveStatic    => self.save_static(&features, capture),
            AppMode::SaveDynamic   => self.save_dynamic(&features, capture),
            AppMode::DetectStatic | AppMode::DetectDynamic => self.detect(&features, mode),
            AppMode::Free | AppMode::Quit => self.prediction = Prediction::Skipped,
        }
    }

    fn detect(&mut self, features: &FeatureVector, mode: AppMode) {
        let Some(detect_mode) = mode.detect_mode() else { return };
        self.prediction = match mode {
            AppMode::DetectDynamic => self.word_gate().predict(features, mode),
            _                      => self.static_gate.predict(features, mode),
        };
        if let Some(label) = self.prediction.label() {
            if let Some(edit) = self.composer.apply(label, detect_mode, &self.insert_gate) {
                self.status = format!("{:?}", edit);
            }
        }
    }

    fn save_static(&mut self, features: &FeatureVector, capture: bool) {
        if !capture { return; }
        let Some(index) = self.static_cursor.selected() else {
            self.status = "select a label with < and > first".to_string();
            return;
        };
        match self.dataset.append(index, features) {
            Ok(()) => {
                self.static_counts[index] += 1;
                self.status = format!("saved sample {}", self.static_counts[index]);
            }
            Err(e) => {
                warn!("saving sample: {}", e);
                self.status = "could not save sample".to_string();
            }
        }
    }

    fn save_dynamic(&mut self, features: &FeatureVector, capture: bool) {
        if capture && !self.recorder.is_recording() {
            let label = self.dynamic_cursor.selected()
                .and_then(|i| self.dynamic_labels().get(i))
                .cloned();
            match label {
                Some(label) => { self.recorder.start(&label); }
                None => {
                    self.status = "select a label with < and > first".to_string();
                    return;
                }
            }
        }
        match self.recorder.push(features) {
            Ok(Some(path)) => {
                if let Some(i) = self.dynamic_cursor.selected() {
                    self.dynamic_counts[i] += 1;
                }
                debug!(path = %path.display(), "sequence counted");
                self.status = "sequence saved".to_string();
            }
            Ok(None) => {}
            Err(e) => {
                warn!("saving sequence: {}", e);
                self.recorder.cancel();
                self.status = "could not save sequence".to_string();
            }
        }
    }

    /// Stop the timer thread.  Called on quit; also happens on drop.
    pub fn shutdown(&mut self) {
        self.stop_timer();
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn mode(&self)           -> AppMode     { self.modes.mode() }
    pub fn should_quit(&self)    -> bool        { self.modes.should_quit() }
    pub fn prediction(&self)     -> &Prediction { &self.prediction }
    pub fn composer(&self)       -> &Composer   { &self.composer }
    pub fn insert_gate(&self)    -> &InsertGate { &self.insert_gate }
    pub fn timer_running(&self)  -> bool        { self.timer.is_some() }

    /// Right-hand status-bar text: the selected label in the save modes,
    /// the gate state in the detect modes.
    pub fn detail(&self) -> String {
        let mode = self.modes.mode();
        let (labels, cursor, counts) = match mode {
            AppMode::SaveStatic  => (self.static_gate.labels(), &self.static_cursor, &self.static_counts),
            AppMode::SaveDynamic => (self.dynamic_labels(), &self.dynamic_cursor, &self.dynamic_counts),
            m if m.is_detect() => {
                let gate = if self.insert_gate.is_open() { "ready" } else { "wait" };
                return format!("{}  {}", gate, self.status);
            }
            _ => return self.status.clone(),
        };
        let selected = cursor.selected().and_then(|i| labels.get(i).map(|l| (i, l)));
        match (selected, self.recorder.progress()) {
            (Some((_, label)), Some((n, total))) => format!("recording {} {}/{}", label, n, total),
            (Some((i, label)), None)             => format!("label: {} ({} saved)", label, counts[i]),
            (None, _)                            => "label: none".to_string(),
        }
    }

    pub fn scene<'a>(&'a self, detail: &'a str, tracker_status: &'a str) -> Scene<'a> {
        let mode = self.modes.mode();
        Scene {
            title:          mode.title(),
            detail,
            hand:           self.hand.as_ref(),
            show_landmarks: self.modes.show_landmarks() && mode != AppMode::Free,
            prediction:     &self.prediction,
            show_text:      mode.is_detect(),
            word:           self.composer.word(),
            sentence:       self.composer.sentence(),
            selected:       self.composer.cursor(),
            tracker_status,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Load everything, open the window and drive the frame loop until `q` or
/// the window is closed.
pub fn run(settings: &Settings) -> Result<(), AppError> {
    let resources = Resources::load(settings)?;
    let mut app = AppState::new(settings, resources)?;

    // ── Simulated tracker replays the recorded static dataset ────────────
    let samples = match read_samples(&settings.static_mode.dataset) {
        Ok(Some(s)) => s,
        Ok(None)    => Vec::new(),
        Err(e) => {
            warn!("reading samples for the simulated hand: {}", e);
            Vec::new()
        }
    };
    info!(samples = samples.len(), "simulated hand tracker ready");
    let (sim_tx, sim_rx) = mpsc::channel();
    let mut tracker = SimHandSource::new(sim_rx, samples);

    let mut vis = Visualizer::new(sim_tx)?;

    // ── Main loop ────────────────────────────────────────────────────────
    while vis.is_open() {
        for key in vis.poll_input() {
            app.handle_key(key);
        }
        if app.should_quit() { break; }

        let hands = tracker.detect();
        app.process_frame(&hands);

        let detail = app.detail();
        let tracker_status = tracker.status();
        vis.render(&app.scene(&detail, &tracker_status));
    }

    app.shutdown();
    info!("bye");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
