//! Subcommand handlers and the shared form plumbing

pub mod config;
pub mod generate;
pub mod health;
pub mod key;
pub mod show;
pub mod validate;

use anyhow::Result;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use interview_assistant::config::config_path;
use interview_assistant::validation::load_attachment;
use interview_assistant::{
    validate, ClientConfig, CredentialStore, ExportFormat, Field, FieldErrorKind, FieldViolation,
    FormInput, GenerationResult, SubmissionWorkflow, ValidationReport,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::style::*;

/// Shown one after another while a submission is pending
pub const PROGRESS_STEPS: [&str; 5] = [
    "Uploading resume...",
    "Parsing resume content...",
    "Analyzing job requirements...",
    "Generating questions with AI...",
    "Formatting results...",
];

const PROGRESS_STEP_INTERVAL: Duration = Duration::from_secs(2);

/// Everything a command needs besides its own arguments
pub struct Context {
    pub config: ClientConfig,
    pub config_path: PathBuf,
    pub credentials: CredentialStore,
}

impl Context {
    pub fn load(config: Option<PathBuf>, server_url: Option<String>) -> Result<Self> {
        let config_path = match config {
            Some(path) => path,
            None => config_path()?,
        };
        let mut config = ClientConfig::load_from(&config_path)?;
        if let Some(url) = server_url {
            debug!("Server URL overridden to {}", url);
            config.server_url = url;
        }

        // the credential file lives next to the config file
        let credentials = match config_path.parent() {
            Some(dir) => CredentialStore::new(
                dir.join(interview_assistant::credentials::CREDENTIALS_FILE_NAME),
            ),
            None => CredentialStore::default_location()?,
        };

        Ok(Self {
            config,
            config_path,
            credentials,
        })
    }
}

/// Form fields as command-line flags
#[derive(Args, Debug)]
pub struct FormArgs {
    /// Resume file (PDF, DOCX or TXT, at most 10MB)
    #[arg(short, long)]
    pub resume: Option<PathBuf>,

    /// Job description text
    #[arg(short, long, conflicts_with = "job_description_file")]
    pub job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    pub job_description_file: Option<PathBuf>,

    /// technical, behavioral, system_design, coding or domain_specific
    #[arg(short = 't', long)]
    pub round_type: Option<String>,

    /// beginner, intermediate, advanced or expert
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Number of questions (1-50)
    #[arg(short, long)]
    pub num_questions: Option<String>,

    /// Comma-separated topics to focus on
    #[arg(short, long, default_value = "")]
    pub focus_areas: String,

    /// Gemini API key (falls back to the cached key)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Where and how exports are written
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Export directory (default: output_dir from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(long, default_value = "text")]
    pub format: ExportFormat,
}

impl OutputArgs {
    pub fn dir(&self, ctx: &Context) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| ctx.config.output_dir.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Cache a key (prompts when no value is given)
    Set { value: Option<String> },
    /// Forget the cached key
    Clear,
    /// Show the cached key, masked
    Show,
}

/// A form built from flags, plus the files that could not be read
pub struct FormDraft {
    pub input: FormInput,
    load_errors: Vec<FieldViolation>,
}

impl FormDraft {
    /// Field checks with unreadable files reported on their fields
    pub fn report(&self) -> ValidationReport {
        let mut report = validate(&self.input);
        for violation in &self.load_errors {
            report.replace(violation.clone());
        }
        report
    }
}

/// Build a form from flags, filling gaps from the config and the credential cache
pub fn build_form(ctx: &Context, args: &FormArgs) -> Result<FormDraft> {
    let mut load_errors = Vec::new();

    let resume = match args.resume.as_deref().map(load_attachment) {
        Some(Ok(attachment)) => Some(attachment),
        Some(Err(violation)) => {
            debug!("Resume not loaded: {}", violation.message);
            load_errors.push(violation);
            None
        }
        None => None,
    };

    let job_description = match (&args.job_description, &args.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                load_errors.push(FieldViolation::new(
                    Field::JobDescription,
                    FieldErrorKind::MissingField,
                    format!("Failed to read {}: {}", path.display(), e),
                ));
                String::new()
            }
        },
        (None, None) => String::new(),
    };

    let api_key = match &args.api_key {
        Some(key) => key.clone(),
        None => ctx.credentials.load()?.unwrap_or_default(),
    };

    let input = FormInput {
        resume,
        job_description,
        round_type: args
            .round_type
            .clone()
            .unwrap_or_else(|| ctx.config.default_round_type.as_str().to_string()),
        difficulty: args
            .difficulty
            .clone()
            .unwrap_or_else(|| ctx.config.default_difficulty.as_str().to_string()),
        num_questions: args
            .num_questions
            .clone()
            .unwrap_or_else(|| ctx.config.default_num_questions.to_string()),
        focus_areas: args.focus_areas.clone(),
        api_key,
    };

    Ok(FormDraft { input, load_errors })
}

pub fn print_form_summary(input: &FormInput) {
    match &input.resume {
        Some(resume) => print_key_value("Resume", &resume.describe()),
        None => print_key_value("Resume", &style_dim("none")),
    }
    print_key_value(
        "Job description",
        &format!("{} characters", input.job_description.trim().chars().count()),
    );
    print_key_value("Interview type", input.round_type.trim());
    print_key_value("Difficulty", input.difficulty.trim());
    print_key_value("Questions", input.num_questions.trim());
    let focus = input.focus_area_list();
    if !focus.is_empty() {
        print_key_value("Focus areas", &focus.join(", "));
    }
}

pub fn print_violations(report: &ValidationReport) {
    print_section("Please fix the following");
    for violation in report.violations() {
        println!(
            "    {} {}: {}",
            icon_error(),
            style_bold(violation.field.label()),
            style_red(&violation.message)
        );
    }
    println!();
}

/// Run a submission behind a spinner that walks through the progress steps
pub async fn generate_with_progress(
    workflow: &SubmissionWorkflow,
    input: &FormInput,
) -> interview_assistant::Result<Arc<GenerationResult>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER_FRAMES),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));

    let generation = workflow.generate(input);
    tokio::pin!(generation);

    let mut ticker = tokio::time::interval(PROGRESS_STEP_INTERVAL);
    let mut step = 0;

    let result = loop {
        tokio::select! {
            result = &mut generation => break result,
            _ = ticker.tick() => {
                spinner.set_message(PROGRESS_STEPS[step.min(PROGRESS_STEPS.len() - 1)]);
                step += 1;
            }
        }
    };

    spinner.finish_and_clear();
    result
}
