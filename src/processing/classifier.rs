//! Bag-of-words linear classifier loaded from a pretrained JSON artifact
//!
//! The artifact carries a fitted TF-IDF vocabulary and logistic-regression
//! weights. Two flavours exist: a `category` model that predicts the job
//! category of a resume, and a `match` model that predicts whether a
//! resume/job pair is a match from their concatenated text.

use crate::error::{Result, ResumeScorerError};
use log::{debug, info};
use ndarray::{Array1, Array2};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Category,
    Match,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerSpec {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// On-disk form of a trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub kind: ClassifierKind,
    pub vectorizer: VectorizerSpec,
    pub classes: Vec<String>,
    /// One row per class, or a single row for binary models
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ClassifierArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeScorerError::ModelLoading(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ResumeScorerError::ModelLoading(format!("Invalid classifier artifact: {}", e)))
    }

    /// Validate dimensions and build the runtime model
    pub fn into_model(self) -> Result<LinearTextClassifier> {
        let features = self.vectorizer.vocabulary.len();

        if self.classes.len() < 2 {
            return Err(ResumeScorerError::ModelLoading(
                "classifier needs at least two classes".to_string(),
            ));
        }
        if self.vectorizer.idf.len() != features {
            return Err(ResumeScorerError::ModelLoading(format!(
                "idf has {} entries for a vocabulary of {}",
                self.vectorizer.idf.len(),
                features
            )));
        }
        if let Some((term, idx)) = self.vectorizer.vocabulary.iter().find(|(_, idx)| **idx >= features) {
            return Err(ResumeScorerError::ModelLoading(format!(
                "vocabulary term '{}' has out-of-range index {}",
                term, idx
            )));
        }

        let rows = self.coefficients.len();
        let binary = rows == 1 && self.classes.len() == 2;
        if !binary && rows != self.classes.len() {
            return Err(ResumeScorerError::ModelLoading(format!(
                "{} coefficient rows for {} classes",
                rows,
                self.classes.len()
            )));
        }
        if self.intercepts.len() != rows {
            return Err(ResumeScorerError::ModelLoading(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                rows
            )));
        }
        if let Some(row) = self.coefficients.iter().find(|row| row.len() != features) {
            return Err(ResumeScorerError::ModelLoading(format!(
                "coefficient row has {} weights, expected {}",
                row.len(),
                features
            )));
        }

        let flat: Vec<f64> = self.coefficients.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, features), flat)
            .map_err(|e| ResumeScorerError::ModelLoading(e.to_string()))?;

        let vectorizer = TfIdfVectorizer::new(self.vectorizer)?;

        Ok(LinearTextClassifier {
            kind: self.kind,
            vectorizer,
            classes: self.classes,
            weights,
            intercepts: Array1::from(self.intercepts),
        })
    }
}

/// Result of running a classifier on a resume/job pair
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted resume category, for category models
    pub label: Option<String>,
    /// Match likelihood in 0.0..=1.0
    pub score: f32,
}

/// Seam for anything that can turn a resume/job pair into a match likelihood
pub trait Classifier: Send + Sync {
    fn predict(&self, resume: &str, job: &str) -> Result<Prediction>;

    fn kind(&self) -> ClassifierKind;
}

pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    stop_words: HashSet<String>,
    token_regex: Regex,
}

impl TfIdfVectorizer {
    pub fn new(spec: VectorizerSpec) -> Result<Self> {
        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ResumeScorerError::ModelLoading(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(r"\b\w\w+\b")
            .map_err(|e| ResumeScorerError::ModelLoading(format!("Invalid token regex: {}", e)))?;

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: Array1::from(spec.idf),
            ngram_range: spec.ngram_range,
            sublinear_tf: spec.sublinear_tf,
            stop_words: spec.stop_words.into_iter().collect(),
            token_regex,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// L2-normalized TF-IDF vector of `text`
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut tf = Array1::<f64>::zeros(self.vocabulary.len());

        for term in self.terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                tf[idx] += 1.0;
            }
        }

        if self.sublinear_tf {
            tf.mapv_inplace(|count| if count > 0.0 { 1.0 + count.ln() } else { 0.0 });
        }

        let mut weighted = tf * &self.idf;
        let norm = weighted.dot(&weighted).sqrt();
        if norm > 0.0 {
            weighted /= norm;
        }
        weighted
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

pub struct LinearTextClassifier {
    kind: ClassifierKind,
    vectorizer: TfIdfVectorizer,
    classes: Vec<String>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

impl LinearTextClassifier {
    /// Load and validate an artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let model = ClassifierArtifact::load(path)?.into_model()?;
        info!(
            "Loaded {:?} classifier from {} ({} classes, {} features)",
            model.kind,
            path.display(),
            model.classes.len(),
            model.vectorizer.vocabulary_size()
        );
        Ok(model)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class probabilities for `text`, ordered like `classes()`
    pub fn predict_proba(&self, text: &str) -> Vec<f64> {
        let features = self.vectorizer.transform(text);
        let decision = self.weights.dot(&features) + &self.intercepts;

        if decision.len() == 1 {
            let positive = sigmoid(decision[0]);
            return vec![1.0 - positive, positive];
        }

        let max = decision.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let exp = decision.mapv(|v| (v - max).exp());
        let total = exp.sum();
        exp.iter().map(|v| v / total).collect()
    }

    /// Most likely class for `text` with its probability
    pub fn predict_class(&self, text: &str) -> (usize, f64) {
        argmax(&self.predict_proba(text))
    }

    fn positive_class(&self) -> usize {
        self.classes
            .iter()
            .position(|c| matches!(c.to_lowercase().as_str(), "1" | "true" | "match" | "yes"))
            .unwrap_or(self.classes.len() - 1)
    }
}

impl Classifier for LinearTextClassifier {
    fn predict(&self, resume: &str, job: &str) -> Result<Prediction> {
        match self.kind {
            ClassifierKind::Match => {
                let combined = format!("{} {}", resume, job);
                let probabilities = self.predict_proba(&combined);
                let score = probabilities[self.positive_class()] as f32;
                debug!("Match classifier probability: {:.3}", score);
                Ok(Prediction { label: None, score })
            }
            ClassifierKind::Category => {
                let (class_idx, confidence) = self.predict_class(resume);
                let job_probabilities = self.predict_proba(job);
                let score = job_probabilities[class_idx] as f32;
                let label = self.classes[class_idx].clone();
                debug!(
                    "Resume category '{}' ({:.3}), job agreement {:.3}",
                    label, confidence, score
                );
                Ok(Prediction { label: Some(label), score })
            }
        }
    }

    fn kind(&self) -> ClassifierKind {
        self.kind
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (idx, v)| if v > best.1 { (idx, v) } else { best })
}
