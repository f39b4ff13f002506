//! Generate command - submit the form and render the questions

use super::{build_form, generate_with_progress, print_form_summary, print_violations};
use super::{Context, FormArgs, OutputArgs};
use crate::print_banner;
use crate::style::*;
use anyhow::Result;
use interview_assistant::{HttpGenerator, SubmissionWorkflow, WorkflowError};
use std::sync::Arc;

pub async fn run(ctx: &Context, form: FormArgs, output: OutputArgs, no_export: bool) -> Result<()> {
    print_banner();
    print_header("Generate Interview Questions");

    let draft = build_form(ctx, &form)?;
    print_form_summary(&draft.input);
    print_key_value("Server", &ctx.config.server_url);
    println!();

    // an unreadable file is reported with the other fields, before anything is sent
    let report = draft.report();
    if !report.is_valid() {
        print_violations(&report);
        return Err(WorkflowError::Invalid(report).into());
    }
    let input = draft.input;

    // a key typed on the command line replaces the cached one
    if let Some(key) = &form.api_key {
        ctx.credentials.remember(key)?;
    }

    let generator = HttpGenerator::from_config(&ctx.config)?;
    let workflow = SubmissionWorkflow::new(Arc::new(generator));

    let result = match generate_with_progress(&workflow, &input).await {
        Ok(result) => result,
        Err(WorkflowError::Invalid(report)) => {
            print_violations(&report);
            return Err(WorkflowError::Invalid(report).into());
        }
        Err(e) => {
            if e.is_retryable() {
                print_info(&format!(
                    "Check the service with {} and run the command again",
                    style_cyan("interview health")
                ));
            }
            return Err(e.into());
        }
    };

    print_success(&format!("Generated {} questions", result.questions.len()));
    println!();
    print!("{}", workflow.render(&result));
    println!();

    if no_export {
        return Ok(());
    }

    let path = workflow.export_to_file(
        &output.dir(ctx),
        output.format,
        chrono::Local::now().date_naive(),
    )?;
    print_success(&format!("Questions exported to {}", style_bold(&path.display().to_string())));
    println!();

    Ok(())
}
