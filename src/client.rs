//! Question generator client
//!
//! The generator is reached through one multipart POST carrying the resume
//! and the form fields. The trait is the seam the workflow depends on, so
//! other transports (and test doubles) can stand in for HTTP.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Result, WorkflowError};
use crate::form::{Field, FormInput};
use crate::models::{GenerationResult, HealthStatus};

/// Generate endpoint, relative to the server URL
pub const GENERATE_PATH: &str = "/api/v1/generate-questions";

/// Health endpoint, relative to the server URL
pub const HEALTH_PATH: &str = "/health";

/// Shown when the generator fails without saying why
pub const GENERIC_FAILURE: &str = "Failed to generate questions";

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Send one validated form and return the parsed result
    async fn generate(&self, input: &FormInput) -> Result<GenerationResult>;
}

/// HTTP client for the generator service
pub struct HttpGenerator {
    base_url: String,
    client: Client,
}

impl HttpGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WorkflowError::TransportError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the generator service is up
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        debug!("Checking generator health at {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(WorkflowError::GenerationFailed(format!(
                "Health check failed: {}",
                resp.status()
            )));
        }

        let body = resp.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|e| {
            WorkflowError::GenerationFailed(format!("Failed to parse health response: {}", e))
        })
    }
}

#[async_trait]
impl QuestionGenerator for HttpGenerator {
    async fn generate(&self, input: &FormInput) -> Result<GenerationResult> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        let form = build_form(input)?;

        info!(
            file = input.resume.as_ref().map(|r| r.file_name.as_str()).unwrap_or(""),
            round_type = %input.round_type.trim(),
            num_questions = %input.num_questions.trim(),
            "Submitting generation request"
        );

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let message = error_detail(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(status = status.as_u16(), "Generation failed: {}", message);
            return Err(WorkflowError::GenerationFailed(message));
        }

        let result = GenerationResult::from_slice(&body)?;
        info!("Received {} questions", result.questions.len());
        Ok(result)
    }
}

/// Multipart body for a form; optional focus areas are left out when empty
pub fn build_form(input: &FormInput) -> Result<Form> {
    let resume = input
        .resume
        .as_ref()
        .ok_or_else(|| WorkflowError::GenerationFailed("No resume attached".to_string()))?;

    let mime = resume
        .media_essence()
        .parse::<mime_guess::Mime>()
        .unwrap_or_else(|_| mime_guess::from_path(&resume.file_name).first_or_octet_stream());

    let part = Part::bytes(resume.bytes.clone())
        .file_name(resume.file_name.clone())
        .mime_str(mime.essence_str())
        .map_err(|e| WorkflowError::TransportError(format!("Failed to create multipart part: {}", e)))?;

    let mut form = Form::new()
        .part(Field::Resume.name(), part)
        .text(Field::JobDescription.name(), input.job_description.trim().to_string())
        .text(Field::RoundType.name(), normalize_select(&input.round_type))
        .text(Field::Difficulty.name(), input.difficulty.trim().to_lowercase())
        .text(Field::NumQuestions.name(), input.num_questions.trim().to_string())
        .text(Field::ApiKey.name(), input.api_key.trim().to_string());

    let focus_areas = input.focus_area_list();
    if !focus_areas.is_empty() {
        form = form.text(Field::FocusAreas.name(), focus_areas.join(","));
    }

    Ok(form)
}

/// Send the canonical wire value for a round type the user may have typed loosely
fn normalize_select(value: &str) -> String {
    value
        .parse::<crate::form::RoundType>()
        .map(|r| r.as_str().to_string())
        .unwrap_or_else(|_| value.trim().to_string())
}

/// `detail` string of an error body, if there is one
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

fn transport(e: reqwest::Error) -> WorkflowError {
    WorkflowError::TransportError(e.to_string())
}
