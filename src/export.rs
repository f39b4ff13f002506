//! Export of generated questions
//!
//! The text export is deterministic: the same result always produces the
//! same bytes apart from the "Generated:" date line, which is passed in.

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::Result;
use crate::models::GenerationResult;

const TITLE: &str = "Interview Questions - Generated by Interview Assistant";
const FILE_STEM: &str = "interview-questions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => f.write_str("text"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format '{}' (use text or json)", other)),
        }
    }
}

/// Plain-text export of a result
pub fn export_text(result: &GenerationResult, generated_on: NaiveDate) -> String {
    let mut content = String::new();

    content.push_str(TITLE);
    content.push('\n');
    content.push_str(&"=".repeat(48));
    content.push_str("\n\n");

    content.push_str("Summary:\n");
    content.push_str(&format!("- Total Questions: {}\n", result.total_questions));
    content.push_str(&format!("- Interview Type: {}\n", result.round_type.label()));
    content.push_str(&format!("- Difficulty: {}\n", result.difficulty));
    content.push_str(&format!("- Generated: {}\n\n", generated_on.format("%Y-%m-%d")));

    for (index, question) in result.questions.iter().enumerate() {
        content.push_str(&format!("Question {} ({})\n", index + 1, question.category));
        content.push_str(&"-".repeat(50));
        content.push('\n');
        content.push_str(&question.question);
        content.push_str("\n\n");

        if let Some(context) = question.context() {
            content.push_str(&format!("Context: {}\n\n", context));
        }

        if !question.follow_up_questions.is_empty() {
            content.push_str("Follow-up Questions:\n");
            for follow_up in &question.follow_up_questions {
                content.push_str(&format!("- {}\n", follow_up));
            }
            content.push('\n');
        }

        if !question.expected_topics.is_empty() {
            content.push_str(&format!(
                "Expected Topics: {}\n",
                question.expected_topics.join(", ")
            ));
        }

        content.push_str("\n\n");
    }

    content
}

/// Pretty-printed JSON export of a result
pub fn export_json(result: &GenerationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render a result in the requested format
pub fn export(result: &GenerationResult, format: ExportFormat, generated_on: NaiveDate) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(export_text(result, generated_on)),
        ExportFormat::Json => export_json(result),
    }
}

/// `interview-questions-2024-05-01.txt`
pub fn export_filename(format: ExportFormat, generated_on: NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        FILE_STEM,
        generated_on.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write an export into `dir`, creating it if needed; returns the file path
pub fn write_export(
    dir: &Path,
    result: &GenerationResult,
    format: ExportFormat,
    generated_on: NaiveDate,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(export_filename(format, generated_on));
    let content = export(result, format, generated_on)?;
    std::fs::write(&path, content)?;

    info!("Exported {} questions to {:?}", result.questions.len(), path);
    Ok(path)
}
