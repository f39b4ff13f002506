//! Interview Assistant client
//!
//! Terminal client for the interview question generator. A submission
//! carries a resume attachment and a few form fields; the generator answers
//! with a set of interview questions that can be rendered and exported.
//!
//! ## Module Structure
//!
//! - `form`: Form input, attachment and field vocabulary
//! - `validation`: Field-local validation rules
//! - `models`: Strict response schema (GenerationResult, Question)
//! - `client`: HTTP generator client (multipart submission)
//! - `workflow`: Validate -> submit -> render/export orchestration
//! - `render`: Terminal presentation of results
//! - `export`: Text and JSON export
//! - `credentials`: Locally cached API key
//! - `config`: Client configuration file

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod render;
pub mod validation;
pub mod workflow;

pub use client::{HttpGenerator, QuestionGenerator};
pub use config::ClientConfig;
pub use credentials::CredentialStore;
pub use error::{FieldErrorKind, Result, WorkflowError};
pub use export::ExportFormat;
pub use form::{Attachment, DifficultyLevel, Field, FormInput, RoundType};
pub use models::{GenerationMetadata, GenerationResult, HealthStatus, Question};
pub use validation::{validate, FieldViolation, ValidationReport};
pub use workflow::{SubmissionWorkflow, WorkflowState};
