//! Terminal styling for the interview CLI
//!
//! Everything goes through `console`, so colors are dropped when the output
//! is not a terminal or `NO_COLOR` is set.

use console::{measure_text_width, style, Style};

pub fn style_bold(s: &str) -> String {
    style(s).bold().to_string()
}

pub fn style_dim(s: &str) -> String {
    style(s).dim().to_string()
}

pub fn style_red(s: &str) -> String {
    style(s).red().to_string()
}

pub fn style_cyan(s: &str) -> String {
    style(s).cyan().to_string()
}

pub fn icon_success() -> String {
    style("✓").green().to_string()
}

pub fn icon_error() -> String {
    style("✗").red().to_string()
}

pub fn icon_warning() -> String {
    style("⚠").yellow().to_string()
}

pub fn icon_info() -> String {
    style("ℹ").blue().to_string()
}

pub fn print_success(msg: &str) {
    println!("  {} {}", icon_success(), msg);
}

/// Styled for stderr, so piping stdout does not decide its colors
pub fn print_error(msg: &str) {
    let red = Style::new().red().for_stderr();
    eprintln!("  {} {}", red.apply_to("✗"), red.apply_to(msg));
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", icon_warning(), style(msg).yellow());
}

pub fn print_info(msg: &str) {
    println!("  {} {}", icon_info(), msg);
}

pub fn print_header(title: &str) {
    let rule = "─".repeat(50usize.saturating_sub(measure_text_width(title)));
    println!();
    println!("{}", style(format!(" {} {}", title, rule)).cyan().bold());
    println!();
}

pub fn print_section(title: &str) {
    println!();
    println!("  {}", style(title).bold());
    println!("  {}", style_dim(&"─".repeat(40)));
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", style(format!("{}:", key)).black().bright(), value);
}

/// Lines may already carry styling; widths are measured without escapes
pub fn print_box(title: &str, content: &[&str]) {
    let frame = Style::new().black().bright();
    let inner = content
        .iter()
        .map(|s| measure_text_width(s))
        .chain(std::iter::once(measure_text_width(title)))
        .max()
        .unwrap_or(0);
    let width = inner + 4;
    let pad = |text: &str| " ".repeat(width - measure_text_width(text) - 2);

    println!("  {}", frame.apply_to(format!("╭{}╮", "─".repeat(width))));
    println!(
        "  {} {} {}{}",
        frame.apply_to("│"),
        style(title).bold(),
        pad(title),
        frame.apply_to("│")
    );
    println!("  {}", frame.apply_to(format!("├{}┤", "─".repeat(width))));
    for line in content {
        println!(
            "  {} {} {}{}",
            frame.apply_to("│"),
            line,
            pad(line),
            frame.apply_to("│")
        );
    }
    println!("  {}", frame.apply_to(format!("╰{}╯", "─".repeat(width))));
}

/// Spinner frames shared by the progress indicator
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
