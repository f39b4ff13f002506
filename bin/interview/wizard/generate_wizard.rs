//! Generate Wizard - Interactive CLI

use anyhow::{anyhow, Result};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Editor, Input, Password, Select};
use interview_assistant::credentials::mask;
use interview_assistant::form::{MIN_DESCRIPTION_CHARS, NUM_QUESTIONS_MAX, NUM_QUESTIONS_MIN};
use interview_assistant::validation::{
    check_api_key, check_attachment, check_description, check_num_questions, load_attachment,
};
use interview_assistant::{
    Attachment, DifficultyLevel, ExportFormat, FormInput, HttpGenerator, RoundType,
    SubmissionWorkflow, WorkflowError,
};
use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

use crate::commands::{generate_with_progress, print_violations, Context};
use crate::print_banner;

pub async fn run_generate_wizard(ctx: &Context) -> Result<()> {
    let term = Term::stdout();
    term.clear_screen()?;

    print_banner();
    println!();
    println!(
        "{}",
        style("  Interactive Question Generation Wizard").cyan().bold()
    );
    println!(
        "  {}",
        style("Answer a few questions and get interview questions tailored to a resume").dim()
    );

    let generator = HttpGenerator::from_config(&ctx.config)?;
    let workflow = SubmissionWorkflow::new(Arc::new(generator));

    // the previous answers prefill the next round
    let mut previous: Option<FormInput> = None;

    loop {
        println!();
        let input = collect_form(ctx, previous.as_ref())?;

        println!();
        print_review(&input);

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("  Generate questions?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!();
            println!("  {} Cancelled", style("✗").red());
            return Ok(());
        }

        println!();
        match generate_with_progress(&workflow, &input).await {
            Ok(result) => {
                println!(
                    "  {} Questions generated successfully!",
                    style("✓").green().bold()
                );
                println!();
                print!("{}", workflow.render(&result));
                println!();
                offer_export(ctx, &workflow)?;
            }
            Err(WorkflowError::Invalid(report)) => print_violations(&report),
            Err(e) => {
                println!("  {} {}", style("✗").red(), style(&e).red());
                if e.is_retryable() {
                    println!(
                        "  {} Your answers are kept, you can submit them again",
                        style("ℹ").blue()
                    );
                }
            }
        }

        previous = Some(input);

        println!();
        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("  Generate another set?")
            .default(false)
            .interact()?;
        if !again {
            break;
        }
    }

    println!();
    Ok(())
}

fn collect_form(ctx: &Context, previous: Option<&FormInput>) -> Result<FormInput> {
    let resume = select_resume(previous.and_then(|p| p.resume.as_ref()))?;
    println!(
        "  {} Selected: {}",
        style("✓").green(),
        style(resume.describe()).cyan()
    );

    println!();
    let job_description = enter_job_description(previous.map(|p| p.job_description.as_str()))?;

    println!();
    let (round_type, difficulty, num_questions) = configure_round(ctx, previous)?;

    println!();
    let focus_areas = enter_focus_areas(previous.map(|p| p.focus_areas.as_str()))?;

    println!();
    let api_key = configure_api_key(ctx)?;

    Ok(FormInput {
        resume: Some(resume),
        job_description,
        round_type: round_type.as_str().to_string(),
        difficulty: difficulty.as_str().to_string(),
        num_questions,
        focus_areas,
        api_key,
    })
}

fn select_resume(previous: Option<&Attachment>) -> Result<Attachment> {
    println!("  {}", style("Step 1: Select Resume").bold());
    println!("  {}", style("PDF, DOCX or TXT, up to 10MB").dim());
    println!();

    if let Some(resume) = previous {
        let reuse = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("  Use {} again?", style(&resume.file_name).cyan()))
            .default(true)
            .interact()?;
        if reuse {
            return Ok(resume.clone());
        }
    }

    // the file is read once, by the check that accepts it
    let accepted: RefCell<Option<Attachment>> = RefCell::new(None);
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("  Resume file path")
        .validate_with(|input: &String| -> Result<(), String> {
            let attachment =
                load_attachment(Path::new(input.trim())).map_err(|v| v.message)?;
            if let Some(violation) = check_attachment(Some(&attachment)) {
                return Err(violation.message);
            }
            *accepted.borrow_mut() = Some(attachment);
            Ok(())
        })
        .interact_text()?;

    accepted
        .into_inner()
        .ok_or_else(|| anyhow!("No resume selected"))
}

fn enter_job_description(previous: Option<&str>) -> Result<String> {
    println!("  {}", style("Step 2: Job Description").bold());
    println!(
        "  {}",
        style(format!(
            "At least {} characters. Multi-line text is written in your editor ($EDITOR)",
            MIN_DESCRIPTION_CHARS
        ))
        .dim()
    );
    println!();

    let previous = previous.filter(|t| !t.trim().is_empty());
    let mut sources = vec!["Write or paste it in an editor", "Read it from a file"];
    if previous.is_some() {
        sources.push("Keep the previous description");
    }

    let mut draft = previous.unwrap_or_default().to_string();
    loop {
        let source = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Job description")
            .items(&sources)
            .default(0)
            .interact()?;

        let text = match source {
            0 => match Editor::new().extension(".txt").edit(&draft)? {
                Some(text) => text,
                None => {
                    println!("  {} Editor closed without saving", style("⚠").yellow());
                    continue;
                }
            },
            1 => match read_description_file()? {
                Some(text) => text,
                None => continue,
            },
            _ => previous.unwrap_or_default().to_string(),
        };

        let count = text.trim().chars().count();
        match check_description(&text) {
            None => {
                println!("  {} {} characters", style("✓").green(), style(count).cyan());
                return Ok(text);
            }
            Some(_) => {
                println!(
                    "  {} {} characters (minimum {})",
                    style("✗").red(),
                    style(count).red(),
                    MIN_DESCRIPTION_CHARS
                );
                draft = text;
            }
        }
    }
}

/// `None` when the file cannot be read, after saying why
fn read_description_file() -> Result<Option<String>> {
    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("  Job description file")
        .interact_text()?;
    let path = path.trim().trim_start_matches('@');

    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            println!("  {} Failed to read {}: {}", style("✗").red(), path, e);
            Ok(None)
        }
    }
}

fn configure_round(
    ctx: &Context,
    previous: Option<&FormInput>,
) -> Result<(RoundType, DifficultyLevel, String)> {
    println!("  {}", style("Step 3: Interview Settings").bold());
    println!();

    let default_round = previous
        .and_then(|p| p.round_type.parse().ok())
        .unwrap_or(ctx.config.default_round_type);
    let round_labels: Vec<String> = RoundType::ALL.iter().map(|r| r.label()).collect();
    let round_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("  Interview type")
        .items(&round_labels)
        .default(
            RoundType::ALL
                .iter()
                .position(|r| *r == default_round)
                .unwrap_or(0),
        )
        .interact()?;

    let default_difficulty = previous
        .and_then(|p| p.difficulty.parse().ok())
        .unwrap_or(ctx.config.default_difficulty);
    let difficulty_labels: Vec<&str> = DifficultyLevel::ALL.iter().map(|d| d.as_str()).collect();
    let difficulty_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("  Difficulty")
        .items(&difficulty_labels)
        .default(
            DifficultyLevel::ALL
                .iter()
                .position(|d| *d == default_difficulty)
                .unwrap_or(0),
        )
        .interact()?;

    let default_count = previous
        .map(|p| p.num_questions.clone())
        .unwrap_or_else(|| ctx.config.default_num_questions.to_string());
    let num_questions: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "  Number of questions ({}-{})",
            NUM_QUESTIONS_MIN, NUM_QUESTIONS_MAX
        ))
        .default(default_count)
        .validate_with(|input: &String| -> Result<(), String> {
            match check_num_questions(input) {
                Some(violation) => Err(violation.message),
                None => Ok(()),
            }
        })
        .interact_text()?;

    Ok((
        RoundType::ALL[round_index],
        DifficultyLevel::ALL[difficulty_index],
        num_questions.trim().to_string(),
    ))
}

fn enter_focus_areas(previous: Option<&str>) -> Result<String> {
    println!("  {}", style("Step 4: Focus Areas (optional)").bold());
    println!("  {}", style("Comma-separated, e.g. Python, APIs, Leadership").dim());
    println!();

    let focus: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("  Focus areas")
        .default(previous.unwrap_or_default().to_string())
        .allow_empty(true)
        .interact_text()?;

    Ok(focus)
}

fn configure_api_key(ctx: &Context) -> Result<String> {
    println!("  {}", style("Step 5: Gemini API Key").bold());
    println!("  {}", style("Stored locally so you only enter it once").dim());
    println!();

    if let Some(saved) = ctx.credentials.load()? {
        let use_saved = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("  Use saved API key ({})?", style(mask(&saved)).cyan()))
            .default(true)
            .interact()?;
        if use_saved {
            return Ok(saved);
        }
    }

    println!(
        "  {} Get a key at {}",
        style("ℹ").blue(),
        style("https://aistudio.google.com/app/apikey").yellow()
    );
    println!();

    let api_key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("  Enter API key")
        .validate_with(|input: &String| -> Result<(), String> {
            match check_api_key(input) {
                Some(violation) => Err(violation.message),
                None => Ok(()),
            }
        })
        .interact()?;

    ctx.credentials.remember(&api_key)?;
    println!("  {} API key saved", style("✓").green());

    Ok(api_key.trim().to_string())
}

fn print_review(input: &FormInput) {
    println!("  {}", style("Review").bold());
    println!("  {}", style("─".repeat(40)).dim());
    if let Some(resume) = &input.resume {
        println!("  Resume:         {}", style(resume.describe()).cyan());
    }
    println!(
        "  Job description: {} characters",
        style(input.job_description.trim().chars().count()).cyan()
    );
    println!("  Interview type: {}", style(input.round_type.replace('_', " ")).cyan());
    println!("  Difficulty:     {}", style(&input.difficulty).cyan());
    println!("  Questions:      {}", style(&input.num_questions).cyan());
    let focus = input.focus_area_list();
    if !focus.is_empty() {
        println!("  Focus areas:    {}", style(focus.join(", ")).cyan());
    }
    println!("  API key:        {}", style(mask(&input.api_key)).cyan());
    println!();
}

fn offer_export(ctx: &Context, workflow: &SubmissionWorkflow) -> Result<()> {
    let export = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("  Export questions to a file?")
        .default(true)
        .interact()?;
    if !export {
        return Ok(());
    }

    let formats = ["Text (.txt)", "JSON (.json)"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("  Format")
        .items(&formats)
        .default(0)
        .interact()?;
    let format = if selection == 1 {
        ExportFormat::Json
    } else {
        ExportFormat::Text
    };

    let path = workflow.export_to_file(
        &ctx.config.output_dir,
        format,
        chrono::Local::now().date_naive(),
    )?;
    println!(
        "  {} Exported to {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    Ok(())
}
