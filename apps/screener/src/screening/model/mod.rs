//! Model bundle: the read-only snapshot of vectorizer, classifier, label
//! decoder and base skill vocabulary shared by every candidate in a run.
//!
//! Loaded once at startup from `MODEL_DIR` and passed into the pipeline by
//! value (`Arc` inside). Nothing mutates it afterwards.
//!
//! Artifacts (JSON):
//! - `vectorizer.json` → [`TfidfVectorizer`]
//! - `classifier.json` → [`LinearClassifier`]
//! - `labels.json`     → [`LabelSet`]
//! - `skills.json`     → base [`SkillVocabulary`]

pub mod hashing;
pub mod linear;
pub mod tfidf;
pub mod vector;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::screening::vocabulary::SkillVocabulary;

pub use hashing::HashingVectorizer;
pub use linear::LinearClassifier;
pub use tfidf::TfidfVectorizer;
pub use vector::TermVector;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABELS_FILE: &str = "labels.json";
pub const SKILLS_FILE: &str = "skills.json";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    #[error("Feature vector has dimension {got}, classifier expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Class index {0} has no label")]
    UnknownClass(usize),
}

/// Maps text into a fixed-dimension, non-negative weighted term vector.
pub trait Vectorizer: Send + Sync {
    fn dimension(&self) -> usize;

    /// `normalized` must already have gone through `normalize::normalize`.
    fn transform(&self, normalized: &str) -> TermVector;
}

/// Maps a feature vector to class probabilities.
pub trait Classifier: Send + Sync {
    fn n_classes(&self) -> usize;
    fn n_features(&self) -> usize;
    fn predict_proba(&self, features: &TermVector) -> Result<Vec<f64>, ModelError>;
}

/// Label decoder: class index → role label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    #[cfg(test)]
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn decode(&self, class: usize) -> Result<&str, ModelError> {
        self.0
            .get(class)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClass(class))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelStatus {
    Loaded,
    Degraded { warning: String },
}

#[derive(Clone)]
pub struct ModelBundle {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Option<Arc<dyn Classifier>>,
    labels: LabelSet,
    base_vocabulary: SkillVocabulary,
    status: ModelStatus,
}

impl ModelBundle {
    /// Assembles a fully functional bundle, checking that the pieces agree on
    /// dimensions and class count.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        classifier: Arc<dyn Classifier>,
        labels: LabelSet,
        base_vocabulary: SkillVocabulary,
    ) -> Result<Self, ModelError> {
        if classifier.n_features() != vectorizer.dimension() {
            return Err(ModelError::Invalid {
                artifact: "classifier",
                reason: format!(
                    "expects {} features but vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.dimension()
                ),
            });
        }
        if classifier.n_classes() != labels.len() {
            return Err(ModelError::Invalid {
                artifact: "labels",
                reason: format!(
                    "{} labels for {} classifier classes",
                    labels.len(),
                    classifier.n_classes()
                ),
            });
        }

        Ok(Self {
            vectorizer,
            classifier: Some(classifier),
            labels,
            base_vocabulary,
            status: ModelStatus::Loaded,
        })
    }

    /// A bundle without a classifier. Role prediction reports the `Unknown`
    /// sentinel; similarity runs on a [`HashingVectorizer`].
    pub fn degraded(base_vocabulary: SkillVocabulary, warning: impl Into<String>) -> Self {
        Self {
            vectorizer: Arc::new(HashingVectorizer::default()),
            classifier: None,
            labels: LabelSet::default(),
            base_vocabulary,
            status: ModelStatus::Degraded {
                warning: warning.into(),
            },
        }
    }

    /// Loads every artifact from `dir`. Any missing or inconsistent artifact
    /// fails the whole load with a single error.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let vectorizer: TfidfVectorizer = read_artifact(dir, VECTORIZER_FILE)?;
        vectorizer.validate()?;
        let classifier: LinearClassifier = read_artifact(dir, CLASSIFIER_FILE)?;
        classifier.validate()?;
        let labels: LabelSet = read_artifact(dir, LABELS_FILE)?;
        let base_vocabulary = load_base_vocabulary(dir)?;

        Self::new(
            Arc::new(vectorizer),
            Arc::new(classifier),
            labels,
            base_vocabulary,
        )
    }

    /// Startup entry point: loads from `dir`, or logs the failure and returns a
    /// degraded bundle carrying it as a warning.
    pub fn load_or_degrade(dir: &Path) -> Self {
        match Self::load(dir) {
            Ok(bundle) => {
                info!(
                    model_dir = %dir.display(),
                    labels = bundle.labels.len(),
                    features = bundle.vectorizer.dimension(),
                    skills = bundle.base_vocabulary.len(),
                    "Model bundle loaded"
                );
                bundle
            }
            Err(e) => {
                let base = load_base_vocabulary(dir).unwrap_or_else(|_| SkillVocabulary::default_base());
                warn!(
                    model_dir = %dir.display(),
                    error = %e,
                    "Model bundle failed to load; role classification disabled"
                );
                Self::degraded(base, format!("Model artifacts unavailable: {e}"))
            }
        }
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifier(&self) -> Option<&dyn Classifier> {
        self.classifier.as_deref()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn base_vocabulary(&self) -> &SkillVocabulary {
        &self.base_vocabulary
    }

    pub fn status(&self) -> &ModelStatus {
        &self.status
    }

    /// The degradation warning, if any.
    pub fn warning(&self) -> Option<&str> {
        match &self.status {
            ModelStatus::Loaded => None,
            ModelStatus::Degraded { warning } => Some(warning.as_str()),
        }
    }
}

/// Reads `skills.json` (a list of phrases).
pub fn load_base_vocabulary(dir: &Path) -> Result<SkillVocabulary, ModelError> {
    let phrases: Vec<String> = read_artifact(dir, SKILLS_FILE)?;
    Ok(SkillVocabulary::new(phrases))
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ModelError> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path).map_err(|source| ModelError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse { path, source })
}
