use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use course_atlas::course::{export_schema, load_all_courses, validate_all_courses, CourseStats};
use course_atlas::{
    parse_syllabus_file, AssignmentEngine, CatalogError, Config, FileStore, TranscriptIngestor,
    UnassignOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "course-atlas")]
#[command(version, about = "Course catalog and transcript management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (overrides the configuration file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a raw transcript and register it as unassigned
    Ingest {
        /// Path to raw transcript file
        #[arg(long)]
        raw: PathBuf,
        /// Source (zoom, descript, vimeo, ...)
        #[arg(long)]
        source: String,
    },
    /// Bind an unassigned transcript to a lesson
    Assign {
        /// Transcript ID
        #[arg(long)]
        transcript: String,
        /// Course ID
        #[arg(long)]
        course: String,
        /// Lesson ID
        #[arg(long)]
        lesson: String,
        /// Assignment method tag (defaults to the configured method)
        #[arg(long)]
        method: Option<String>,
    },
    /// Move a transcript back to the unassigned holding directory
    Unassign {
        /// Transcript ID
        transcript_id: String,
    },
    /// Validate every course document
    Validate,
    /// Convert syllabus text into a course document
    ParseSyllabus {
        /// Syllabus text file
        input: PathBuf,
        /// Course JSON to write
        output: PathBuf,
    },
    /// Show catalog statistics
    Dashboard {
        /// Only show this course
        #[arg(long)]
        course: Option<String>,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the course document JSON Schema
    Schema {
        /// Destination (defaults to the configured schema file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("course-atlas: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            let category = e
                .downcast_ref::<CatalogError>()
                .map(CatalogError::category)
                .unwrap_or("Error");
            error!("❌ {}: {:#}", category, e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load()?,
    };

    if let Some(root) = &cli.root {
        config.project_root = root.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose { "debug" } else { config.logging.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("course_atlas={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(command: Commands, config: Config) -> Result<ExitCode> {
    let store = FileStore::new(&config);

    match command {
        Commands::Ingest { raw, source } => {
            let ingestor = TranscriptIngestor::new(store, config.paths.unassigned_dir.clone());
            let record = ingestor.ingest(&raw, &source).await?;
            info!("   Transcript ID: {}", record.transcript_id);
            info!(
                "   Registry:      {}",
                config
                    .registry_dir()
                    .join(format!("{}.json", record.transcript_id))
                    .display()
            );
        }

        Commands::Assign {
            transcript,
            course,
            lesson,
            method,
        } => {
            let method = method.unwrap_or_else(|| config.assignment.default_method.clone());
            let engine = AssignmentEngine::new(store, config.paths.unassigned_dir.clone());
            engine.assign(&transcript, &course, &lesson, &method).await?;
        }

        Commands::Unassign { transcript_id } => {
            let engine = AssignmentEngine::new(store, config.paths.unassigned_dir.clone());
            match engine.unassign(&transcript_id).await? {
                UnassignOutcome::AlreadyUnassigned(record) => {
                    info!("   Location: {}", record.processed_path.display());
                }
                UnassignOutcome::Unassigned {
                    record, moved_from, ..
                } => {
                    info!(
                        "   File: {} → {}",
                        moved_from.display(),
                        record.processed_path.display()
                    );
                }
            }
        }

        Commands::Validate => {
            let report = validate_all_courses(&config.courses_dir()).await?;

            if report.is_empty() {
                println!("No course files found in {}", config.courses_dir().display());
                return Ok(ExitCode::SUCCESS);
            }

            for (file, outcome) in &report.files {
                match outcome {
                    Ok(()) => println!("✔ VALID:   {}", file.display()),
                    Err(message) => {
                        println!("✘ INVALID: {}", file.display());
                        println!("    Error: {}", message);
                    }
                }
            }

            if !report.all_valid() {
                println!(
                    "\n{} of {} course files are invalid",
                    report.invalid_count(),
                    report.files.len()
                );
                return Ok(ExitCode::FAILURE);
            }
            println!("\n🎉 All course files are valid!");
        }

        Commands::ParseSyllabus { input, output } => {
            parse_syllabus_file(&input, &output).await?;
            println!("Wrote course json to {}", output.display());
        }

        Commands::Dashboard { course, json } => {
            let courses = load_all_courses(&config.courses_dir()).await?;
            if courses.is_empty() {
                warn!("No courses found in {}", config.courses_dir().display());
                return Ok(ExitCode::SUCCESS);
            }

            let stats: Vec<CourseStats> = courses
                .iter()
                .filter(|c| course.as_deref().map_or(true, |id| c.id == id))
                .map(CourseStats::from_course)
                .collect();

            if stats.is_empty() {
                return Err(CatalogError::not_found(
                    "Course",
                    course.unwrap_or_default(),
                )
                .into());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                for course_stats in &stats {
                    println!("{}", course_stats);
                }
            }
        }

        Commands::Schema { output } => {
            let path = output.unwrap_or_else(|| config.schema_file());
            export_schema(&path).await?;
        }

        Commands::ShowConfig => {
            println!("{}", config.summary());
        }
    }

    Ok(ExitCode::SUCCESS)
}
