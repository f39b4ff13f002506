//! Health command - check the generator service

use super::Context;
use crate::print_banner;
use crate::style::*;
use anyhow::Result;
use interview_assistant::HttpGenerator;

pub async fn run(ctx: &Context) -> Result<()> {
    print_banner();
    print_header("Service Health");

    let generator = HttpGenerator::from_config(&ctx.config)?;
    print_key_value("Server", generator.base_url());

    let health = generator.health().await?;
    print_key_value("Status", &health.status);
    print_key_value("Model", health.model.as_deref().unwrap_or("unknown"));
    println!();

    if health.is_healthy() {
        print_success("Generator is ready");
    } else {
        print_warning(&format!("Generator reported status '{}'", health.status));
    }
    println!();
    Ok(())
}
