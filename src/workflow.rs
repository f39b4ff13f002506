//! Submission workflow
//!
//! Drives one user-initiated submission through
//! `Idle -> Validating -> Submitting -> {Rendered | Failed}`.
//!
//! At most one submission is in flight per workflow. The flag is taken
//! before anything else happens and released by a guard on every exit path,
//! including the submitting future being dropped. A second attempt while the
//! flag is held fails with `AlreadyInProgress` and changes nothing.
//!
//! The last successful result is held for export and replaced wholesale by
//! the next successful submission. A failed submission keeps the previous
//! result.

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::QuestionGenerator;
use crate::error::{Result, WorkflowError};
use crate::export::{self, ExportFormat};
use crate::form::FormInput;
use crate::models::GenerationResult;
use crate::render;
use crate::validation::{self, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    Validating,
    Submitting,
    Rendered,
    Failed,
}

pub struct SubmissionWorkflow {
    generator: Arc<dyn QuestionGenerator>,
    in_flight: AtomicBool,
    state: RwLock<WorkflowState>,
    current: RwLock<Option<Arc<GenerationResult>>>,
}

/// Releases the in-flight flag; a submission abandoned mid-way ends as `Failed`
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a RwLock<WorkflowState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.state.write();
            if matches!(*state, WorkflowState::Validating | WorkflowState::Submitting) {
                warn!("Submission abandoned before it settled");
                *state = WorkflowState::Failed;
            }
        }
        self.flag.store(false, Ordering::Release);
    }
}

impl SubmissionWorkflow {
    pub fn new(generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            generator,
            in_flight: AtomicBool::new(false),
            state: RwLock::new(WorkflowState::Idle),
            current: RwLock::new(None),
        }
    }

    pub fn state(&self) -> WorkflowState {
        *self.state.read()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Last successful result, if any
    pub fn current_result(&self) -> Option<Arc<GenerationResult>> {
        self.current.read().clone()
    }

    /// Check every field; does not change workflow state
    pub fn validate(&self, input: &FormInput) -> ValidationReport {
        validation::validate(input)
    }

    /// Full user-initiated flow: validate, then submit if the form is valid
    pub async fn generate(&self, input: &FormInput) -> Result<Arc<GenerationResult>> {
        let _guard = self.begin()?;

        self.transition(WorkflowState::Validating);
        let report = validation::validate(input);
        if !report.is_valid() {
            debug!("Form rejected with {} violation(s)", report.len());
            self.transition(WorkflowState::Failed);
            return Err(WorkflowError::Invalid(report));
        }

        self.send(input).await
    }

    /// Send an already validated form.
    ///
    /// The form is checked again and refused with `Invalid` if it does not
    /// pass, so nothing invalid ever leaves the client.
    pub async fn submit(&self, input: &FormInput) -> Result<Arc<GenerationResult>> {
        let _guard = self.begin()?;

        let report = validation::validate(input);
        if !report.is_valid() {
            self.transition(WorkflowState::Failed);
            return Err(WorkflowError::Invalid(report));
        }

        self.send(input).await
    }

    /// Styled presentation of a result
    pub fn render(&self, result: &GenerationResult) -> String {
        render::render(result)
    }

    /// Text export of the held result
    pub fn export(&self, generated_on: NaiveDate) -> Result<String> {
        self.export_as(ExportFormat::Text, generated_on)
    }

    pub fn export_as(&self, format: ExportFormat, generated_on: NaiveDate) -> Result<String> {
        let result = self.current_result().ok_or(WorkflowError::NothingToExport)?;
        export::export(&result, format, generated_on)
    }

    /// Write the held result into `dir` under a date-stamped name
    pub fn export_to_file(
        &self,
        dir: &Path,
        format: ExportFormat,
        generated_on: NaiveDate,
    ) -> Result<PathBuf> {
        let result = self.current_result().ok_or(WorkflowError::NothingToExport)?;
        export::write_export(dir, &result, format, generated_on)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejected submission: another one is pending");
            return Err(WorkflowError::AlreadyInProgress);
        }

        // a new attempt always starts from Idle, whatever the last one ended in
        self.transition(WorkflowState::Idle);

        Ok(InFlightGuard {
            flag: &self.in_flight,
            state: &self.state,
        })
    }

    async fn send(&self, input: &FormInput) -> Result<Arc<GenerationResult>> {
        self.transition(WorkflowState::Submitting);

        match self.generator.generate(input).await {
            Ok(result) => {
                let result = Arc::new(result);
                *self.current.write() = Some(Arc::clone(&result));
                self.transition(WorkflowState::Rendered);
                info!("Generated {} questions", result.questions.len());
                Ok(result)
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                self.transition(WorkflowState::Failed);
                Err(e)
            }
        }
    }

    fn transition(&self, next: WorkflowState) {
        let mut state = self.state.write();
        debug!("Workflow state {:?} -> {:?}", *state, next);
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Attachment, DifficultyLevel, Field, RoundType};
    use crate::error::FieldErrorKind;
    use crate::models::Question;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready, task};

    /// Generator double that counts calls and can be held open
    struct FakeGenerator {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        outcome: fn() -> Result<GenerationResult>,
    }

    impl FakeGenerator {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                outcome: || Ok(sample_result("Explain the borrow checker.")),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                outcome: || Err(WorkflowError::GenerationFailed("Question generation error".into())),
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::ok()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuestionGenerator for FakeGenerator {
        async fn generate(&self, _input: &FormInput) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.outcome)()
        }
    }

    fn sample_result(text: &str) -> GenerationResult {
        GenerationResult {
            questions: vec![Question {
                question: text.to_string(),
                category: "Technical".to_string(),
                difficulty: DifficultyLevel::Intermediate,
                context: None,
                follow_up_questions: vec![],
                expected_topics: vec![],
            }],
            total_questions: 1,
            round_type: RoundType::Technical,
            difficulty: DifficultyLevel::Intermediate,
            metadata: None,
        }
    }

    fn valid_input() -> FormInput {
        FormInput {
            resume: Some(Attachment::new("resume.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46])),
            job_description: "Platform engineer owning CI infrastructure, build caching and developer tooling."
                .to_string(),
            round_type: "technical".to_string(),
            difficulty: "intermediate".to_string(),
            num_questions: "5".to_string(),
            focus_areas: String::new(),
            api_key: "AIzaSyA1234567890abcdefghij".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_generate_success_holds_result() {
        let generator = Arc::new(FakeGenerator::ok());
        let workflow = SubmissionWorkflow::new(generator.clone());
        assert_eq!(workflow.state(), WorkflowState::Idle);

        let result = workflow.generate(&valid_input()).await.unwrap();
        assert_eq!(result.questions[0].question, "Explain the borrow checker.");
        assert_eq!(workflow.state(), WorkflowState::Rendered);
        assert_eq!(generator.calls(), 1);
        assert!(!workflow.is_submitting());

        let held = workflow.current_result().unwrap();
        assert!(Arc::ptr_eq(&held, &result));
    }

    #[tokio::test]
    async fn test_blank_required_field_never_submits() {
        let generator = Arc::new(FakeGenerator::ok());
        let workflow = SubmissionWorkflow::new(generator.clone());

        let mut input = valid_input();
        input.job_description = "   ".to_string();

        match workflow.generate(&input).await {
            Err(WorkflowError::Invalid(report)) => {
                assert_eq!(
                    report.get(Field::JobDescription).map(|v| v.kind),
                    Some(FieldErrorKind::MissingField)
                );
            }
            other => panic!("expected Invalid, got {:?}", other),
        }

        // submit refuses the same form too
        assert!(matches!(
            workflow.submit(&input).await,
            Err(WorkflowError::Invalid(_))
        ));

        assert_eq!(generator.calls(), 0);
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert!(!workflow.is_submitting());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(FakeGenerator::gated(gate.clone()));
        let workflow = SubmissionWorkflow::new(generator.clone());
        let input = valid_input();

        let mut first = task::spawn(workflow.submit(&input));
        assert_pending!(first.poll());
        assert!(workflow.is_submitting());
        assert_eq!(workflow.state(), WorkflowState::Submitting);

        let second = workflow.submit(&input).await;
        assert!(matches!(second, Err(WorkflowError::AlreadyInProgress)));
        let also_generate = workflow.generate(&input).await;
        assert!(matches!(also_generate, Err(WorkflowError::AlreadyInProgress)));

        // rejection leaves the pending submission untouched
        assert_eq!(workflow.state(), WorkflowState::Submitting);
        assert_eq!(generator.calls(), 1);

        gate.notify_one();
        assert!(first.is_woken());
        let result = assert_ready!(first.poll());
        assert!(result.is_ok());
        drop(first);

        assert!(!workflow.is_submitting());
        assert_eq!(generator.calls(), 1);

        // once settled a new submission goes through
        gate.notify_one();
        workflow.submit(&input).await.unwrap();
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_dropped_submission_releases_flag() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(FakeGenerator::gated(gate.clone()));
        let workflow = SubmissionWorkflow::new(generator.clone());
        let input = valid_input();

        {
            let mut pending = task::spawn(workflow.submit(&input));
            assert_pending!(pending.poll());
            assert!(workflow.is_submitting());
        }

        assert!(!workflow.is_submitting());
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert!(workflow.current_result().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let workflow = SubmissionWorkflow::new(Arc::new(FakeGenerator::ok()));
        workflow.generate(&valid_input()).await.unwrap();
        let before = workflow.export(date()).unwrap();

        let failing = SubmissionWorkflow {
            generator: Arc::new(FakeGenerator::failing()),
            in_flight: AtomicBool::new(false),
            state: RwLock::new(WorkflowState::Rendered),
            current: RwLock::new(workflow.current_result()),
        };

        match failing.generate(&valid_input()).await {
            Err(WorkflowError::GenerationFailed(msg)) => {
                assert_eq!(msg, "Question generation error")
            }
            other => panic!("expected GenerationFailed, got {:?}", other),
        }
        assert_eq!(failing.state(), WorkflowState::Failed);
        assert_eq!(failing.export(date()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_state_returns_to_idle_on_next_attempt() {
        let gate = Arc::new(Notify::new());
        let workflow = SubmissionWorkflow::new(Arc::new(FakeGenerator::gated(gate.clone())));
        let input = valid_input();

        let mut bad = valid_input();
        bad.num_questions = "99".to_string();
        assert!(workflow.generate(&bad).await.is_err());
        assert_eq!(workflow.state(), WorkflowState::Failed);

        let mut next = task::spawn(workflow.generate(&input));
        assert_pending!(next.poll());
        assert_eq!(workflow.state(), WorkflowState::Submitting);
        gate.notify_one();
        assert!(assert_ready!(next.poll()).is_ok());
        drop(next);
        assert_eq!(workflow.state(), WorkflowState::Rendered);
    }

    #[test]
    fn test_export_without_result() {
        let workflow = SubmissionWorkflow::new(Arc::new(FakeGenerator::ok()));
        assert!(matches!(
            workflow.export(date()),
            Err(WorkflowError::NothingToExport)
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            workflow.export_to_file(dir.path(), ExportFormat::Text, date()),
            Err(WorkflowError::NothingToExport)
        ));
    }

    #[tokio::test]
    async fn test_export_to_file_after_success() {
        let workflow = SubmissionWorkflow::new(Arc::new(FakeGenerator::ok()));
        workflow.generate(&valid_input()).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = workflow
            .export_to_file(dir.path(), ExportFormat::Json, date())
            .unwrap();
        assert!(path.ends_with("interview-questions-2024-05-01.json"));

        let parsed = GenerationResult::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.questions[0].question, "Explain the borrow checker.");
    }
}
