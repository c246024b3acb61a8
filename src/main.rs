//! Resume scorer: keyword and TF-IDF based resume match scoring

use clap::Parser;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use resume_scorer::cli::{self, Cli, Commands, ConfigAction};
use resume_scorer::config::{Config, ScoringConfig};
use resume_scorer::input::manager::InputManager;
use resume_scorer::output::formatter::{save_report_to_file, ReportGenerator};
use resume_scorer::processing::classifier::LinearTextClassifier;
use resume_scorer::processing::keywords::{ExtractionOptions, KeywordExtractor};
use resume_scorer::{Result, ResumeScorerError, Scorer};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            job_text,
            output,
            detailed,
            save,
            seed,
            no_classifier,
            model,
            bigrams,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeScorerError::InvalidInput)?,
                None => config.output.format,
            };

            let mut scoring = config.scoring.clone();
            if no_classifier {
                scoring.use_classifier = false;
            }
            if bigrams {
                scoring.include_bigrams = true;
            }

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.load_text(&resume).await?;
            let job_text = match (job, job_text) {
                (Some(path), _) => input_manager.load_text(&path).await?,
                (None, Some(text)) => text,
                (None, None) => {
                    info!("No job description given, scoring against a generic description");
                    String::new()
                }
            };

            let artifact = model.or_else(|| config.model.artifact_path.clone());
            let scorer = build_scorer(scoring, artifact)?;

            let report = match seed {
                Some(seed) => scorer.score_with_rng(&resume_text, &job_text, &mut StdRng::seed_from_u64(seed)),
                None => scorer.score(&resume_text, &job_text),
            };
            info!("Scored {} with overall score {}", resume.display(), report.overall_score);

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed,
                config.output.pretty_json,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;
            println!("{}", rendered);

            if let Some(save_path) = save {
                save_report_to_file(&rendered, &save_path)?;
                println!("💾 Report saved to: {}", save_path.display());
            }
        }

        Commands::Keywords { file, bigrams } => {
            let mut options = ExtractionOptions::from(&config.scoring);
            if bigrams {
                options.include_bigrams = true;
            }
            let extractor = KeywordExtractor::new(options);

            let mut input_manager = InputManager::new();
            let text = input_manager.load_text(&file).await?;
            let keywords = extractor.extract(&text);

            println!("🔑 {} keywords in {}\n", keywords.len(), file.display());
            for keyword in keywords.iter() {
                println!("  • {}", keyword);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

/// Build the scorer, attaching the classifier when one is configured and loads
fn build_scorer(scoring: ScoringConfig, artifact: Option<PathBuf>) -> Result<Scorer> {
    let use_classifier = scoring.use_classifier;
    let scorer = Scorer::new(scoring)?;

    let Some(path) = artifact.filter(|_| use_classifier) else {
        return Ok(scorer);
    };

    match LinearTextClassifier::load(&path) {
        Ok(classifier) => Ok(scorer.with_classifier(Arc::new(classifier))),
        Err(e) => {
            warn!("Classifier unavailable ({}), scoring without it", e);
            Ok(scorer)
        }
    }
}
