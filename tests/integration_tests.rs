//! Integration tests for the resume scorer

use rand::rngs::StdRng;
use rand::SeedableRng;
use resume_scorer::config::{OutputFormat, ScoringConfig};
use resume_scorer::input::manager::InputManager;
use resume_scorer::output::formatter::ReportGenerator;
use resume_scorer::processing::classifier::{Classifier, ClassifierKind, LinearTextClassifier};
use resume_scorer::Scorer;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

const SAMPLE_RESUME: &str = "Jane Doe\n\
Software Engineer\n\n\
Experience\n\
Acme Corp, Senior Developer, Jan 2019 - Mar 2023\n\
Led a team of five engineers building React dashboards backed by Python services.\n\
Improved API latency by 40% and reduced cloud spend by $20k per year.\n\
Developed data analysis pipelines for customer reporting.\n\n\
Education\n\
B.S. Computer Science, State University, 2018\n\n\
Skills\n\
Python, JavaScript, React, SQL, Docker, problem solving\n";

const SAMPLE_JOB: &str = "We are hiring a software engineer with strong Python and React \
experience. Kubernetes and GraphQL knowledge is a plus.";

fn fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn scorer() -> Scorer {
    Scorer::new(ScoringConfig::default()).unwrap()
}

#[tokio::test]
async fn test_text_loading_from_txt() {
    let file = fixture(SAMPLE_RESUME);
    let mut manager = InputManager::new();

    let text = manager.load_text(file.path()).await.unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let file = fixture(SAMPLE_RESUME);
    let mut manager = InputManager::new();

    let text1 = manager.load_text(file.path()).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.load_text(file.path()).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_cache_disabled() {
    let file = fixture(SAMPLE_JOB);
    let mut manager = InputManager::new().with_cache(false);

    manager.load_text(file.path()).await.unwrap();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_any_extension_is_read_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.description");
    std::fs::write(&path, SAMPLE_JOB).unwrap();

    let mut manager = InputManager::new();
    let text = manager.load_text(&path).await.unwrap();
    assert_eq!(text, SAMPLE_JOB);
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.load_text(path).await;
    assert!(result.is_err());
}

#[test]
fn test_seeded_scores_are_reproducible() {
    let scorer = scorer();

    let first = scorer.score_with_rng(SAMPLE_RESUME, SAMPLE_JOB, &mut StdRng::seed_from_u64(11));
    let second = scorer.score_with_rng(SAMPLE_RESUME, SAMPLE_JOB, &mut StdRng::seed_from_u64(11));
    assert_eq!(first, second);
}

#[test]
fn test_end_to_end_report() {
    let report = scorer().score_with_rng(SAMPLE_RESUME, SAMPLE_JOB, &mut StdRng::seed_from_u64(3));

    assert!((50..=100).contains(&report.overall_score));
    assert_eq!(report.categories.len(), 3);
    assert!(!report.suggestions.is_empty());
    assert!(report.matched_keywords.contains(&"python".to_string()));
    assert!(report.missing_keywords.contains(&"kubernetes".to_string()));
    assert!(report.predicted_category.is_none());
}

#[test]
fn test_not_a_resume() {
    let report = scorer().score("Buy cheap widgets online today.", SAMPLE_JOB);

    assert_eq!(report.overall_score, 10);
    assert!(report.breakdown.is_none());
    assert!(!report.suggestions.is_empty());
}

#[test]
fn test_menu_mentioning_university_is_not_a_resume() {
    let menu = "Today at the university cafeteria we serve tomato soup, grilled cheese sandwiches, \
        garden salad with ranch dressing, roasted vegetables, rice pilaf, baked chicken, \
        chocolate chip cookies and fresh fruit. Drinks include coffee, tea, lemonade and water. \
        Open from seven until three every weekday for all guests.";

    let report = scorer().score(menu, SAMPLE_JOB);
    assert_eq!(report.overall_score, 10);
    assert!(report.breakdown.is_none());
}

#[test]
fn test_empty_job_description_uses_generic() {
    let report = scorer().score_with_rng(SAMPLE_RESUME, "   ", &mut StdRng::seed_from_u64(5));

    assert!((50..=100).contains(&report.overall_score));
    assert!(report.matched_keywords.contains(&"react".to_string()));
}

#[test]
fn test_classifier_artifact_from_file() {
    let artifact = r#"{
        "kind": "category",
        "vectorizer": {
            "vocabulary": {"python": 0, "react": 1, "nurse": 2, "patient": 3},
            "idf": [1.0, 1.0, 1.0, 1.0]
        },
        "classes": ["Engineering", "Healthcare"],
        "coefficients": [[3.0, 3.0, -3.0, -3.0], [-3.0, -3.0, 3.0, 3.0]],
        "intercepts": [0.0, 0.0]
    }"#;
    let file = fixture(artifact);

    let classifier = LinearTextClassifier::load(file.path()).unwrap();
    assert_eq!(classifier.kind(), ClassifierKind::Category);

    let scorer = scorer().with_classifier(Arc::new(classifier));
    assert!(scorer.uses_classifier());

    let report = scorer.score_with_rng(SAMPLE_RESUME, SAMPLE_JOB, &mut StdRng::seed_from_u64(9));
    assert_eq!(report.predicted_category.as_deref(), Some("Engineering"));
    let breakdown = report.breakdown.unwrap();
    assert!(breakdown.classifier_score.unwrap() > 0.5);
}

#[test]
fn test_malformed_artifact_is_rejected() {
    let file = fixture("{\"kind\": \"category\"}");
    assert!(LinearTextClassifier::load(file.path()).is_err());
}

#[test]
fn test_json_report_output() {
    let report = scorer().score_with_rng(SAMPLE_RESUME, SAMPLE_JOB, &mut StdRng::seed_from_u64(1));
    let generator = ReportGenerator::with_options(false, false, false, false);

    let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
    assert!(json.contains("\"overallScore\""));
    assert!(json.contains("\"Content Relevance\""));
}
