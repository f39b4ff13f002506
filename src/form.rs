//! Form input for a question generation request
//!
//! Field values are kept as raw text, exactly as the user typed them, so
//! that blank or unparseable input reaches validation instead of being
//! rejected earlier by the type system.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Maximum resume size accepted by the generator (10 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Minimum job description length, in characters after trimming
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Minimum API key length, in characters after trimming
pub const MIN_API_KEY_CHARS: usize = 20;

pub const NUM_QUESTIONS_MIN: i64 = 1;
pub const NUM_QUESTIONS_MAX: i64 = 50;
pub const DEFAULT_NUM_QUESTIONS: u32 = 10;

/// Media types accepted for the resume
pub const ALLOWED_MEDIA_TYPES: [&str; 3] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// File extensions accepted for the resume (lowercase, no dot)
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Form fields, named as the generator expects them in the multipart body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Resume,
    JobDescription,
    RoundType,
    Difficulty,
    NumQuestions,
    FocusAreas,
    ApiKey,
}

impl Field {
    /// Multipart part name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Resume => "resume",
            Field::JobDescription => "job_description",
            Field::RoundType => "round_type",
            Field::Difficulty => "difficulty",
            Field::NumQuestions => "num_questions",
            Field::FocusAreas => "focus_areas",
            Field::ApiKey => "api_key",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Field::Resume => "Resume",
            Field::JobDescription => "Job description",
            Field::RoundType => "Interview type",
            Field::Difficulty => "Difficulty",
            Field::NumQuestions => "Number of questions",
            Field::FocusAreas => "Focus areas",
            Field::ApiKey => "API key",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interview round types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Technical,
    Behavioral,
    SystemDesign,
    Coding,
    DomainSpecific,
}

impl RoundType {
    pub const ALL: [RoundType; 5] = [
        RoundType::Technical,
        RoundType::Behavioral,
        RoundType::SystemDesign,
        RoundType::Coding,
        RoundType::DomainSpecific,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Technical => "technical",
            RoundType::Behavioral => "behavioral",
            RoundType::SystemDesign => "system_design",
            RoundType::Coding => "coding",
            RoundType::DomainSpecific => "domain_specific",
        }
    }

    /// Wire value with underscores shown as spaces ("system design")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        RoundType::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| format!("Unknown interview type '{}'", s.trim()))
    }
}

/// Question difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DifficultyLevel::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("Unknown difficulty '{}'", s.trim()))
    }
}

/// The uploaded resume
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    /// Size in bytes as reported by the file system
    pub size: u64,
    /// Declared media type, e.g. `application/pdf`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            size: bytes.len() as u64,
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a resume from disk, guessing its media type from the extension.
    ///
    /// The size comes from the file metadata. Contents of a file over
    /// `MAX_ATTACHMENT_BYTES` are never read: the attachment keeps its size
    /// with empty bytes, so validation still reports it as too large.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| anyhow!("File not found: {}", path.display()))?;
        if !metadata.is_file() {
            return Err(anyhow!("Not a file: {}", path.display()));
        }

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let size = metadata.len();
        if size > MAX_ATTACHMENT_BYTES {
            debug!(file = %file_name, size, "Resume over the size limit, contents not read");
            return Ok(Self {
                file_name,
                size,
                media_type,
                bytes: Vec::new(),
            });
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(Self::new(file_name, media_type, bytes))
    }

    /// Lowercased text after the last dot, if the name has one.
    ///
    /// A dot-file such as `.pdf` counts as having the `pdf` extension.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Declared media type without parameters, lowercased
    pub fn media_essence(&self) -> String {
        self.media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    /// "resume.pdf (1.5 KB)"
    pub fn describe(&self) -> String {
        format!("{} ({})", self.file_name, format_file_size(self.size))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("size", &self.size)
            .field("media_type", &self.media_type)
            .finish()
    }
}

/// Everything the user filled in for one submission attempt
#[derive(Clone, Default)]
pub struct FormInput {
    pub resume: Option<Attachment>,
    pub job_description: String,
    pub round_type: String,
    pub difficulty: String,
    pub num_questions: String,
    pub focus_areas: String,
    pub api_key: String,
}

impl FormInput {
    /// Focus areas split on commas, trimmed, empties dropped
    pub fn focus_area_list(&self) -> Vec<String> {
        self.focus_areas
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Text value of a field, `None` for the attachment
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Resume => None,
            Field::JobDescription => Some(&self.job_description),
            Field::RoundType => Some(&self.round_type),
            Field::Difficulty => Some(&self.difficulty),
            Field::NumQuestions => Some(&self.num_questions),
            Field::FocusAreas => Some(&self.focus_areas),
            Field::ApiKey => Some(&self.api_key),
        }
    }
}

impl fmt::Debug for FormInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormInput")
            .field("resume", &self.resume)
            .field("job_description_chars", &self.job_description.chars().count())
            .field("round_type", &self.round_type)
            .field("difficulty", &self.difficulty)
            .field("num_questions", &self.num_questions)
            .field("focus_areas", &self.focus_areas)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Human-readable file size: "0 Bytes", "512 Bytes", "1.5 KB", "10 MB"
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
