//! Output formatters for score reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScorerError};
use crate::output::report::{Category, IssueType, ScoreReport};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering score reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter; emits the wire shape of the report
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = score_label(score);

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_category(&self, category: &Category) -> String {
        let mut output = format!(
            "{}: {}% {}\n",
            category.title,
            category.score,
            self.format_score_badge(category.score)
        );
        for issue in &category.issues {
            let line = match issue.issue_type {
                IssueType::Success => format!("  ✔ {}", self.colorize(&issue.message, Color::Green)),
                IssueType::Warning => format!("  ⚠ {}", self.colorize(&issue.message, Color::Yellow)),
            };
            output.push_str(&line);
            output.push('\n');
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH REPORT", 1));
        output.push_str(&format!(
            "Generated: {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Overall", 2));
        output.push_str(&format!(
            "Overall Score: {}/100 {}\n",
            report.overall_score,
            self.format_score_badge(report.overall_score)
        ));
        output.push_str(&format!("{}\n", self.colorize(&report.summary, Color::Cyan)));
        if let Some(category) = &report.predicted_category {
            output.push_str(&format!("Predicted category: {}\n", category));
        }

        output.push_str(&self.format_header("Categories", 2));
        for category in &report.categories {
            output.push_str(&self.format_category(category));
        }

        output.push_str(&self.format_header("Suggestions", 2));
        for (i, suggestion) in report.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        if self.detailed {
            output.push_str(&self.format_header("Keyword Details", 3));
            if !report.matched_keywords.is_empty() {
                output.push_str(&format!(
                    "Matched: {}\n",
                    self.colorize(&report.matched_keywords.join(", "), Color::Green)
                ));
            }
            if !report.missing_keywords.is_empty() {
                output.push_str(&format!(
                    "Missing: {}\n",
                    self.colorize(&report.missing_keywords.join(", "), Color::Red)
                ));
            }
            if let Some(breakdown) = &report.breakdown {
                output.push_str(&format!("Keyword overlap: {:.1}%\n", breakdown.overlap_ratio * 100.0));
                if let Some(score) = breakdown.classifier_score {
                    output.push_str(&format!("Classifier score: {:.1}%\n", score * 100.0));
                }
                output.push_str(&format!(
                    "Base score: {} | Fairness adjustment: {:+}\n",
                    breakdown.base_score, breakdown.fairness_offset
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Match Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str(&format!(
            "**Overall Score:** {}/100 ({})\n\n",
            report.overall_score,
            score_label(report.overall_score).0
        ));
        output.push_str(&format!("{}\n\n", report.summary));
        if let Some(category) = &report.predicted_category {
            output.push_str(&format!("**Predicted category:** {}\n\n", category));
        }

        output.push_str("## Categories\n\n");
        output.push_str("| Category | Score |\n");
        output.push_str("|----------|-------|\n");
        for category in &report.categories {
            output.push_str(&format!("| {} | {}% |\n", category.title, category.score));
        }
        output.push('\n');

        for category in &report.categories {
            output.push_str(&format!("### {}\n\n", category.title));
            for issue in &category.issues {
                let marker = match issue.issue_type {
                    IssueType::Success => "✅",
                    IssueType::Warning => "⚠️",
                };
                output.push_str(&format!("- {} {}\n", marker, issue.message));
            }
            output.push('\n');
        }

        output.push_str("## Suggestions\n\n");
        for (i, suggestion) in report.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        if !report.missing_keywords.is_empty() {
            output.push_str(&format!(
                "\n**Missing keywords:** {}\n",
                report
                    .missing_keywords
                    .iter()
                    .map(|k| format!("`{}`", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn score_label(score: u8) -> (&'static str, Color) {
    match score {
        90..=100 => ("EXCELLENT", Color::Green),
        80..=89 => ("VERY GOOD", Color::BrightGreen),
        70..=79 => ("GOOD", Color::Yellow),
        60..=69 => ("FAIR", Color::BrightYellow),
        50..=59 => ("BELOW AVG", Color::Red),
        _ => ("POOR", Color::BrightRed),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    let write_failed = |e: std::io::Error| {
        ResumeScorerError::OutputFormatting(format!("Failed to write report to {}: {}", file_path.display(), e))
    };
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(file_path, content).map_err(write_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::Issue;

    fn sample_report() -> ScoreReport {
        ScoreReport {
            overall_score: 82,
            summary: "Your resume shows a 82% match for this role based on keyword alignment.".to_string(),
            categories: vec![
                Category::new("Content Relevance", 82)
                    .with_issue(Issue::success("Alignment with provided job description")),
                Category::new("Formatting & Structure", 79)
                    .with_issue(Issue::warning("Inconsistent date formatting")),
            ],
            suggestions: vec!["Consider adding keywords like: sql".to_string()],
            predicted_category: Some("Engineering".to_string()),
            matched_keywords: vec!["python".to_string()],
            missing_keywords: vec!["sql".to_string()],
            breakdown: None,
        }
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.contains("Overall Score: 82/100 [VERY GOOD]"));
        assert!(output.contains("Content Relevance: 82%"));
        assert!(output.contains("⚠ Inconsistent date formatting"));
        assert!(output.contains("1. Consider adding keywords like: sql"));
        assert!(output.contains("Missing: sql"));
        assert!(output.contains("Predicted category: Engineering"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let output = JsonFormatter::new(false).format_report(&report).unwrap();

        assert!(output.contains("\"overallScore\":82"));
        let parsed: ScoreReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(false)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.starts_with("# Resume Match Report"));
        assert!(!output.contains("**Generated:**"));
        assert!(output.contains("| Formatting & Structure | 79% |"));
        assert!(output.contains("- ⚠️ Inconsistent date formatting"));
        assert!(output.contains("`sql`"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false);
        let json = generator.generate_report(&sample_report(), &OutputFormat::Json).unwrap();
        assert!(json.contains("\"summary\""));

        let console = generator.generate_report(&sample_report(), &OutputFormat::Console).unwrap();
        assert!(!console.contains("Matched:"));

        assert_eq!(JsonFormatter::new(true).supports_format(), OutputFormat::Json);
        assert_eq!(MarkdownFormatter::new(true).supports_format(), OutputFormat::Markdown);
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.json");

        save_report_to_file("{}", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_report_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let result = save_report_to_file("{}", &blocker.join("out.json"));
        assert!(matches!(result, Err(ResumeScorerError::OutputFormatting(_))));
    }
}
