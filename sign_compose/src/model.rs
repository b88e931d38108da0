//! A small fully-connected network loaded from JSON.
//!
//! The file holds the layers in order:
//!
//! ```json
//! { "layers": [
//!     { "weights": [[...42 inputs...], ...], "bias": [...], "activation": "relu" },
//!     ...
//!     { "weights": [...], "bias": [...], "activation": "softmax" }
//! ] }
//! ```
//!
//! `weights` is indexed `[output][input]`.  The first layer must take the
//! 42-value feature vector; each later layer takes the previous layer's
//! outputs.  The last layer's width is the number of classes.

use hand_landmarks::{FeatureVector, FEATURE_LEN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::predict::Classifier;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("reading model {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: io::Error },
    #[error("parsing model {}: {source}", .path.display())]
    Parse { path: PathBuf, #[source] source: serde_json::Error },
    #[error("model has no layers")]
    NoLayers,
    #[error("layer {layer}: {reason}")]
    Shape { layer: usize, reason: String },
    #[error("classifier has {classes} outputs but the label set has {labels} labels")]
    ClassCount { classes: usize, labels: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Softmax,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights:    Vec<Vec<f32>>,
    pub bias:       Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out: Vec<f32> = self.weights.iter().zip(&self.bias)
            .map(|(row, b)| b + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>())
            .collect();
        match self.activation {
            Activation::Linear  => {}
            Activation::Relu    => out.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Softmax => softmax(&mut out),
        }
        out
    }
}

fn softmax(v: &mut [f32]) {
    let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for x in v.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > 0.0 {
        v.iter_mut().for_each(|x| *x /= sum);
    }
}

#[derive(Deserialize)]
struct ModelFile {
    layers: Vec<DenseLayer>,
}

// ════════════════════════════════════════════════════════════════════════════
// DenseClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct DenseClassifier {
    layers: Vec<DenseLayer>,
}

impl DenseClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ModelError::NotFound(path.to_path_buf()),
            _ => ModelError::Io { path: path.to_path_buf(), source: e },
        })?;
        let file: ModelFile = serde_json::from_str(&text)
            .map_err(|source| ModelError::Parse { path: path.to_path_buf(), source })?;
        let model = Self::from_layers(file.layers)?;
        info!(path = %path.display(), layers = model.layers.len(), classes = model.num_classes(), "loaded model");
        Ok(model)
    }

    /// Validate layer shapes and build the classifier.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self, ModelError> {
        if layers.is_empty() {
            return Err(ModelError::NoLayers);
        }
        let mut width = FEATURE_LEN;
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(ModelError::Shape { layer: i, reason: "no outputs".into() });
            }
            if layer.weights.len() != layer.bias.len() {
                return Err(ModelError::Shape {
                    layer:  i,
                    reason: format!("{} weight rows but {} biases", layer.weights.len(), layer.bias.len()),
                });
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != width) {
                return Err(ModelError::Shape {
                    layer:  i,
                    reason: format!("expected {} inputs, found a row of {}", width, row.len()),
                });
            }
            width = layer.weights.len();
        }
        Ok(DenseClassifier { layers })
    }
}

impl Classifier for DenseClassifier {
    fn num_classes(&self) -> usize {
        self.layers.last().map_or(0, |l| l.bias.len())
    }

    fn probabilities(&self, features: &FeatureVector) -> Vec<f32> {
        self.layers.iter().fold(features.to_vec(), |x, layer| layer.forward(&x))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
