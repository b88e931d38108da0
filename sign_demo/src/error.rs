use sign_compose::ModelError;
use sign_labels::LabelError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Anything that stops the demo from starting.  Reported, then the process
/// exits.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Labels(#[from] LabelError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),
    #[error("reading settings {}: {source}", .path.display())]
    SettingsIo { path: PathBuf, #[source] source: io::Error },
    #[error("parsing settings {}: {source}", .path.display())]
    SettingsParse { path: PathBuf, #[source] source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("window: {0}")]
    Window(#[from] minifb::Error),
}
