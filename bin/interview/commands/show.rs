//! Show command - render a saved JSON result

use super::{Context, OutputArgs};
use crate::style::*;
use anyhow::{Context as _, Result};
use interview_assistant::export::write_export;
use interview_assistant::render::render;
use interview_assistant::GenerationResult;
use std::path::PathBuf;

pub fn run(ctx: &Context, file: PathBuf, export: bool, output: OutputArgs) -> Result<()> {
    let body = std::fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    let result = GenerationResult::from_slice(&body)
        .with_context(|| format!("{} is not a saved question set", file.display()))?;

    println!();
    print!("{}", render(&result));
    println!();

    if export {
        let path = write_export(
            &output.dir(ctx),
            &result,
            output.format,
            chrono::Local::now().date_naive(),
        )?;
        print_success(&format!("Questions exported to {}", style_bold(&path.display().to_string())));
        println!();
    }

    Ok(())
}
