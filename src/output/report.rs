//! Score report structures returned to callers

use serde::{Deserialize, Serialize};

/// Structured result of scoring a resume against a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// Overall match score (0-100)
    pub overall_score: u8,

    /// One-line human readable verdict
    pub summary: String,

    /// Per-category breakdown, in display order
    pub categories: Vec<Category>,

    /// Actionable suggestions, never empty
    pub suggestions: Vec<String>,

    /// Resume category predicted by a category classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_category: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_keywords: Vec<String>,

    /// How the overall score was composed; absent for rejected documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub score: u8,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub overlap_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_score: Option<f32>,
    /// Clamped score before the fairness adjustment
    pub base_score: u8,
    pub fairness_offset: i32,
}

impl Category {
    pub fn new(title: impl Into<String>, score: u8) -> Self {
        Self {
            title: title.into(),
            score,
            issues: Vec::new(),
        }
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.issue_type == IssueType::Warning)
            .count()
    }
}

impl Issue {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            issue_type: IssueType::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            issue_type: IssueType::Warning,
            message: message.into(),
        }
    }

    /// Either a success or a warning message depending on `passed`
    pub fn check(passed: bool, success: impl Into<String>, warning: impl Into<String>) -> Self {
        if passed {
            Self::success(success)
        } else {
            Self::warning(warning)
        }
    }
}

impl ScoreReport {
    pub fn category(&self, title: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let report = ScoreReport {
            overall_score: 72,
            summary: "ok".to_string(),
            categories: vec![Category::new("Content Relevance", 72)
                .with_issue(Issue::warning("Alignment with provided job description"))],
            suggestions: vec!["Add metrics".to_string()],
            predicted_category: None,
            matched_keywords: Vec::new(),
            missing_keywords: vec!["sql".to_string()],
            breakdown: None,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "overallScore": 72,
                "summary": "ok",
                "categories": [{
                    "title": "Content Relevance",
                    "score": 72,
                    "issues": [{"type": "warning", "message": "Alignment with provided job description"}]
                }],
                "suggestions": ["Add metrics"],
                "missingKeywords": ["sql"]
            })
        );
    }

    #[test]
    fn test_issue_check() {
        assert_eq!(Issue::check(true, "yes", "no"), Issue::success("yes"));
        assert_eq!(Issue::check(false, "yes", "no"), Issue::warning("no"));
    }
}
