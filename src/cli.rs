//! CLI interface for the resume scorer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-scorer")]
#[command(about = "Keyword and TF-IDF based resume match scorer")]
#[command(long_about = "Score a resume against a job description using keyword overlap, an optional pretrained text classifier and resume structure checks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Score {
        /// Path to resume text file
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description text file
        #[arg(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show matched and missing keywords and the score breakdown
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Seed for the fairness adjustment, for reproducible scores
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the classifier even if a model is configured
        #[arg(long)]
        no_classifier: bool,

        /// Classifier artifact (JSON) to load
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Include bigram keywords
        #[arg(long)]
        bigrams: bool,
    },

    /// Print the keywords extracted from a text file
    Keywords {
        /// Path to text file
        file: PathBuf,

        /// Include bigram keywords
        #[arg(long)]
        bigrams: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}
