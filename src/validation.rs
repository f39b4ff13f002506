//! Field-local validation of a submission
//!
//! Every field is checked independently and all violations are collected,
//! so the whole form can be corrected in one pass. Each field reports at
//! most one violation: the first rule it breaks.

use serde::Serialize;
use std::path::Path;

use crate::error::FieldErrorKind;
use crate::form::{
    Attachment, DifficultyLevel, Field, FormInput, RoundType, ALLOWED_EXTENSIONS,
    ALLOWED_MEDIA_TYPES, MAX_ATTACHMENT_BYTES, MIN_API_KEY_CHARS, MIN_DESCRIPTION_CHARS,
    NUM_QUESTIONS_MAX, NUM_QUESTIONS_MIN,
};

/// A rejected field and the message to show next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: Field,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: Field, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of validating a whole form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Violation recorded for a field, if any
    pub fn get(&self, field: Field) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }

    /// Record a violation, replacing whatever its field already reported.
    ///
    /// Violations stay in form order.
    pub fn replace(&mut self, violation: FieldViolation) {
        self.violations.retain(|v| v.field != violation.field);
        self.violations.push(violation);
        self.violations.sort_by_key(|v| v.field);
    }

    fn push(&mut self, violation: Option<FieldViolation>) {
        if let Some(v) = violation {
            self.violations.push(v);
        }
    }
}

/// Validate every field of the form
pub fn validate(input: &FormInput) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.push(check_attachment(input.resume.as_ref()));
    report.push(check_description(&input.job_description));
    report.push(check_round_type(&input.round_type));
    report.push(check_difficulty(&input.difficulty));
    report.push(check_num_questions(&input.num_questions));
    report.push(check_api_key(&input.api_key));

    report
}

fn missing(field: Field) -> FieldViolation {
    FieldViolation::new(field, FieldErrorKind::MissingField, "This field is required")
}

/// Load a resume from disk, turning an unreadable path into a `Resume` violation
pub fn load_attachment(path: &Path) -> Result<Attachment, FieldViolation> {
    Attachment::from_path(path).map_err(|e| {
        FieldViolation::new(
            Field::Resume,
            FieldErrorKind::MissingField,
            format!("{:#}", e),
        )
    })
}

/// Resume: present, PDF/DOCX/TXT by media type or extension, at most 10 MiB
pub fn check_attachment(attachment: Option<&Attachment>) -> Option<FieldViolation> {
    let Some(file) = attachment else {
        return Some(FieldViolation::new(
            Field::Resume,
            FieldErrorKind::MissingField,
            "Please select a resume file",
        ));
    };

    let media_ok = ALLOWED_MEDIA_TYPES.contains(&file.media_essence().as_str());
    let extension_ok = file
        .extension()
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    if !media_ok && !extension_ok {
        return Some(FieldViolation::new(
            Field::Resume,
            FieldErrorKind::UnsupportedType,
            "Please select a PDF, DOCX, or TXT file",
        ));
    }

    if file.size > MAX_ATTACHMENT_BYTES {
        return Some(FieldViolation::new(
            Field::Resume,
            FieldErrorKind::TooLarge,
            "File size must be less than 10MB",
        ));
    }

    None
}

/// Job description: required, at least 50 characters once trimmed
pub fn check_description(value: &str) -> Option<FieldViolation> {
    let value = value.trim();
    if value.is_empty() {
        return Some(missing(Field::JobDescription));
    }
    if value.chars().count() < MIN_DESCRIPTION_CHARS {
        return Some(FieldViolation::new(
            Field::JobDescription,
            FieldErrorKind::TooShort,
            format!(
                "Job description should be at least {} characters",
                MIN_DESCRIPTION_CHARS
            ),
        ));
    }
    None
}

pub fn check_round_type(value: &str) -> Option<FieldViolation> {
    if value.trim().is_empty() {
        return Some(missing(Field::RoundType));
    }
    value
        .parse::<RoundType>()
        .err()
        .map(|e| FieldViolation::new(Field::RoundType, FieldErrorKind::OutOfRange, e))
}

pub fn check_difficulty(value: &str) -> Option<FieldViolation> {
    if value.trim().is_empty() {
        return Some(missing(Field::Difficulty));
    }
    value
        .parse::<DifficultyLevel>()
        .err()
        .map(|e| FieldViolation::new(Field::Difficulty, FieldErrorKind::OutOfRange, e))
}

/// Number of questions: required integer within [1, 50]
pub fn check_num_questions(value: &str) -> Option<FieldViolation> {
    let value = value.trim();
    if value.is_empty() {
        return Some(missing(Field::NumQuestions));
    }

    let in_range = value
        .parse::<i64>()
        .map(|n| (NUM_QUESTIONS_MIN..=NUM_QUESTIONS_MAX).contains(&n))
        .unwrap_or(false);

    if in_range {
        None
    } else {
        Some(FieldViolation::new(
            Field::NumQuestions,
            FieldErrorKind::OutOfRange,
            format!(
                "Value must be between {} and {}",
                NUM_QUESTIONS_MIN, NUM_QUESTIONS_MAX
            ),
        ))
    }
}

/// API key: required, at least 20 characters once trimmed
pub fn check_api_key(value: &str) -> Option<FieldViolation> {
    let value = value.trim();
    if value.is_empty() {
        return Some(missing(Field::ApiKey));
    }
    if value.chars().count() < MIN_API_KEY_CHARS {
        return Some(FieldViolation::new(
            Field::ApiKey,
            FieldErrorKind::TooShort,
            "Please enter a valid Gemini API key",
        ));
    }
    None
}
