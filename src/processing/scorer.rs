//! Resume scoring: keyword overlap, optional classifier blend and report composition

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::output::report::{Category, Issue, ScoreBreakdown, ScoreReport};
use crate::processing::classifier::{Classifier, Prediction};
use crate::processing::keywords::{ExtractionOptions, KeywordExtractor, KeywordSet};
use crate::processing::signals::{DateFormatting, ResumeSignals, SignalDetector, SHORT_RESUME_WORDS};
use log::{debug, info, warn};
use rand::Rng;
use std::sync::Arc;

/// Used when the caller supplies no job description
pub const GENERIC_JOB_DESCRIPTION: &str =
    "software engineer python javascript react data analysis problem solving";

/// Used when the job description yields no keywords at all
pub const FALLBACK_JOB_KEYWORDS: [&str; 3] = ["software", "engineer", "development"];

pub const CONTENT_RELEVANCE: &str = "Content Relevance";
pub const FORMATTING_STRUCTURE: &str = "Formatting & Structure";
pub const PROFESSIONAL_IMPACT: &str = "Professional Impact";

const FORMATTING_CAP: i32 = 90;
const IMPACT_CAP: i32 = 88;
const FAILED_CHECK_PENALTY: i32 = 8;
const STRONG_RELEVANCE: u8 = 75;
const ROLE_ALIGNMENT_RATIO: f64 = 0.5;

/// Scores resumes against job descriptions with one configurable strategy
pub struct Scorer {
    config: ScoringConfig,
    extractor: KeywordExtractor,
    detector: SignalDetector,
    classifier: Option<Arc<dyn Classifier>>,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        let extractor = KeywordExtractor::new(ExtractionOptions::from(&config));
        let detector = SignalDetector::new()?;

        Ok(Self {
            config,
            extractor,
            detector,
            classifier: None,
        })
    }

    /// Attach a pretrained classifier; ignored when `use_classifier` is off
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn uses_classifier(&self) -> bool {
        self.config.use_classifier && self.classifier.is_some()
    }

    /// Score with the thread-local RNG driving the fairness adjustment
    pub fn score(&self, resume: &str, job: &str) -> ScoreReport {
        self.score_with_rng(resume, job, &mut rand::thread_rng())
    }

    /// Score with a caller-supplied RNG, so seeded runs are reproducible
    pub fn score_with_rng<R: Rng>(&self, resume: &str, job: &str, rng: &mut R) -> ScoreReport {
        let job = if job.trim().is_empty() {
            debug!("Empty job description, using generic description");
            GENERIC_JOB_DESCRIPTION
        } else {
            job
        };

        let signals = self.detector.detect(resume);
        if !signals.is_resume_like(self.config.min_word_count) {
            info!(
                "Document rejected as non-resume ({} words, section keywords: {})",
                signals.word_count, signals.has_section_keywords
            );
            return self.not_a_resume_report(&signals);
        }

        let resume_keywords = self.extractor.extract(resume);
        let mut job_keywords = self.extractor.extract(job);
        if job_keywords.is_empty() {
            job_keywords = KeywordSet::from_words(FALLBACK_JOB_KEYWORDS);
        }

        let prediction = self.classify(resume, job);
        let classifier_score = prediction.as_ref().map(|p| p.score);

        let overlap_ratio = resume_keywords.overlap_ratio(&job_keywords);
        let base_score = self.base_score(overlap_ratio, classifier_score);
        let fairness_offset = self.fairness_offset(rng);
        let overall_score = self.apply_offset(base_score, fairness_offset);

        debug!(
            "overlap={:.3} classifier={:?} base={} offset={} overall={}",
            overlap_ratio, classifier_score, base_score, fairness_offset, overall_score
        );

        let matched_keywords = resume_keywords.intersection(&job_keywords);
        let missing_keywords = job_keywords.missing_from(&resume_keywords);
        let predicted_category = prediction.and_then(|p| p.label);

        let categories = self.build_categories(
            overall_score,
            overlap_ratio,
            &signals,
            &missing_keywords,
            predicted_category.as_deref(),
        );
        let suggestions = self.build_suggestions(&signals, &missing_keywords);

        let basis = if classifier_score.is_some() {
            "keyword alignment and classifier prediction"
        } else {
            "keyword alignment"
        };

        ScoreReport {
            overall_score,
            summary: format!(
                "Your resume shows a {}% match for this role based on {}.",
                overall_score, basis
            ),
            categories,
            suggestions,
            predicted_category,
            matched_keywords,
            missing_keywords,
            breakdown: Some(ScoreBreakdown {
                overlap_ratio,
                classifier_score,
                base_score,
                fairness_offset,
            }),
        }
    }

    /// Weighted blend of overlap and classifier score, clamped to the base range.
    /// Non-decreasing in `overlap_ratio` for a fixed classifier score.
    pub fn base_score(&self, overlap_ratio: f64, classifier_score: Option<f32>) -> u8 {
        let ratio = overlap_ratio.clamp(0.0, 1.0);
        let keyword_weight = f64::from(self.config.keyword_weight);
        let classifier_weight = f64::from(self.config.classifier_weight);

        let blended = match classifier_score {
            Some(score) if keyword_weight + classifier_weight > 0.0 => {
                let score = f64::from(score.clamp(0.0, 1.0));
                (keyword_weight * ratio + classifier_weight * score) / (keyword_weight + classifier_weight)
            }
            _ => ratio,
        };

        let percent = (blended * 100.0 + 1e-6).floor() as i32;
        percent.clamp(i32::from(self.config.base_min), i32::from(self.config.base_max)) as u8
    }

    fn fairness_offset<R: Rng>(&self, rng: &mut R) -> i32 {
        let (min, max) = (self.config.fairness_min, self.config.fairness_max);
        if min == max {
            min
        } else {
            rng.gen_range(min..=max)
        }
    }

    fn apply_offset(&self, base_score: u8, offset: i32) -> u8 {
        i32::from(base_score)
            .saturating_add(offset)
            .clamp(i32::from(self.config.score_min), i32::from(self.config.score_max)) as u8
    }

    fn classify(&self, resume: &str, job: &str) -> Option<Prediction> {
        if !self.config.use_classifier {
            return None;
        }
        let classifier = self.classifier.as_ref()?;

        match classifier.predict(resume, job) {
            Ok(prediction) => Some(Prediction {
                score: prediction.score.clamp(0.0, 1.0),
                ..prediction
            }),
            Err(e) => {
                warn!("Classifier inference failed, using keyword overlap only: {}", e);
                None
            }
        }
    }

    fn build_categories(
        &self,
        overall_score: u8,
        overlap_ratio: f64,
        signals: &ResumeSignals,
        missing_keywords: &[String],
        predicted_category: Option<&str>,
    ) -> Vec<Category> {
        let mut relevance = Category::new(CONTENT_RELEVANCE, overall_score).with_issue(Issue::check(
            overall_score > STRONG_RELEVANCE,
            "Alignment with provided job description",
            "Alignment with provided job description",
        ));
        if !missing_keywords.is_empty() {
            relevance.push(Issue::warning(format!(
                "Missing job keywords: {}",
                missing_keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            )));
        }
        if let Some(label) = predicted_category {
            relevance.push(Issue::success(format!("Predicted resume category: {}", label)));
        }

        let date_issue = match signals.date_formatting() {
            DateFormatting::Missing => Issue::warning("No dates found for roles or education"),
            DateFormatting::Inconsistent => Issue::warning("Inconsistent date formatting"),
            DateFormatting::Consistent => Issue::success("Consistent date formatting"),
        };
        let length_issue = if signals.is_too_short() {
            Issue::warning(format!("Resume is short ({} words)", signals.word_count))
        } else if signals.is_too_long() {
            Issue::warning(format!("Resume is long ({} words)", signals.word_count))
        } else {
            Issue::success("Resume length is appropriate")
        };
        let structure_issues = vec![
            Issue::check(
                signals.has_experience,
                "Experience section present",
                "No experience section found",
            ),
            Issue::check(
                signals.has_education,
                "Education section present",
                "No education section found",
            ),
            Issue::check(signals.has_skills, "Skills section present", "No skills section found"),
            date_issue,
            length_issue,
        ];
        let mut structure = Category::new(FORMATTING_STRUCTURE, 0);
        structure.issues = structure_issues;
        structure.score = penalized(overall_score, 5, FORMATTING_CAP, &structure);

        let impact_issues = vec![
            Issue::check(
                signals.has_achievement_verbs,
                "Uses strong action verbs",
                "Few action verbs describing achievements",
            ),
            Issue::check(
                signals.has_quantified_metrics,
                "Achievements are quantified",
                "Achievements lack quantifiable metrics",
            ),
        ];
        let mut impact = Category::new(PROFESSIONAL_IMPACT, 0);
        impact.issues = impact_issues;
        impact.score = penalized(overall_score, 3, IMPACT_CAP, &impact);
        if overlap_ratio >= ROLE_ALIGNMENT_RATIO {
            impact.push(Issue::success("Clear role alignment"));
        }

        vec![relevance, structure, impact]
    }

    fn build_suggestions(&self, signals: &ResumeSignals, missing_keywords: &[String]) -> Vec<String> {
        let mut suggestions = Vec::new();

        if !missing_keywords.is_empty() {
            suggestions.push(format!(
                "Consider adding keywords like: {}",
                missing_keywords.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        if !signals.has_experience {
            suggestions.push("Add a clearly labelled Experience section with your roles and responsibilities".to_string());
        }
        if !signals.has_education {
            suggestions.push("Include an Education section with your degrees or certifications".to_string());
        }
        if !signals.has_skills {
            suggestions.push("List your technical skills in a dedicated Skills section".to_string());
        }
        match signals.date_formatting() {
            DateFormatting::Missing => suggestions.push("Add start and end dates to each role".to_string()),
            DateFormatting::Inconsistent => {
                suggestions.push("Use consistent formatting for dates and job titles".to_string())
            }
            DateFormatting::Consistent => {}
        }
        if !signals.has_achievement_verbs {
            suggestions.push("Start bullet points with action verbs such as led, built or improved".to_string());
        }
        if !signals.has_quantified_metrics {
            suggestions.push("Add quantifiable metrics to your achievements".to_string());
        }
        if signals.is_too_short() {
            suggestions.push(format!(
                "Expand on your responsibilities and results; aim for at least {} words",
                SHORT_RESUME_WORDS
            ));
        } else if signals.is_too_long() {
            suggestions.push("Trim older or less relevant experience to keep the resume focused".to_string());
        }

        if suggestions.is_empty() {
            suggestions.push("Tailor your summary to mirror the language of the job description".to_string());
        }
        suggestions
    }

    fn not_a_resume_report(&self, signals: &ResumeSignals) -> ScoreReport {
        let score = self.config.not_resume_score;

        let structure_issue = if signals.word_count < self.config.min_word_count {
            Issue::warning(format!("Document has only {} words", signals.word_count))
        } else {
            Issue::warning("No resume sections detected")
        };

        ScoreReport {
            overall_score: score,
            summary: "This document does not appear to be a resume. Upload a resume with sections such as Experience, Education and Skills.".to_string(),
            categories: vec![
                Category::new(CONTENT_RELEVANCE, score).with_issue(Issue::warning(
                    "Could not evaluate alignment: document is not a resume",
                )),
                Category::new(FORMATTING_STRUCTURE, score).with_issue(structure_issue),
                Category::new(PROFESSIONAL_IMPACT, score)
                    .with_issue(Issue::warning("No achievements found")),
            ],
            suggestions: vec![
                "Upload your resume as a text-based document rather than a scan or image".to_string(),
                "Include standard sections such as Experience, Education and Skills".to_string(),
            ],
            predicted_category: None,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            breakdown: None,
        }
    }
}

/// `overall + bonus`, minus a fixed penalty per warning, within `0..=cap`
fn penalized(overall_score: u8, bonus: i32, cap: i32, category: &Category) -> u8 {
    let failed = category.warning_count() as i32;
    (i32::from(overall_score) + bonus - FAILED_CHECK_PENALTY * failed).clamp(0, cap) as u8
}
