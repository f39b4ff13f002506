//! Validate command - check the form without sending it

use super::{build_form, print_form_summary, print_violations, Context, FormArgs};
use crate::print_banner;
use crate::style::*;
use anyhow::Result;
use interview_assistant::{Field, WorkflowError};

const CHECKED_FIELDS: [Field; 6] = [
    Field::Resume,
    Field::JobDescription,
    Field::RoundType,
    Field::Difficulty,
    Field::NumQuestions,
    Field::ApiKey,
];

pub fn run(ctx: &Context, form: FormArgs) -> Result<()> {
    print_banner();
    print_header("Form Validation");

    let draft = build_form(ctx, &form)?;
    print_form_summary(&draft.input);

    let report = draft.report();

    print_section("Fields");
    for field in CHECKED_FIELDS {
        match report.get(field) {
            Some(violation) => println!(
                "    {} {} {}",
                icon_error(),
                field.label(),
                style_dim(&format!("({:?})", violation.kind))
            ),
            None => println!("    {} {}", icon_success(), field.label()),
        }
    }
    println!();

    if !report.is_valid() {
        print_violations(&report);
        return Err(WorkflowError::Invalid(report).into());
    }

    print_box(
        "Validation Result",
        &[
            &format!("{} All fields are valid", icon_success()),
            "",
            &format!("Run: {} generate with the same flags", style_cyan("interview")),
        ],
    );
    println!();
    Ok(())
}
