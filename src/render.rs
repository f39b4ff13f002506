//! Terminal presentation of a generation result
//!
//! Rendering is pure: it turns a result into styled text and never touches
//! workflow state. Optional question fields that are absent are skipped
//! entirely rather than shown as empty sections.

use console::style;

use crate::models::{GenerationResult, Question};

const RULE_WIDTH: usize = 50;

/// Summary block followed by every question in original order
pub fn render(result: &GenerationResult) -> String {
    let mut out = render_summary(result);
    for (index, question) in result.questions.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_question(index, question));
    }
    out
}

/// Question count, interview type, difficulty and model
pub fn render_summary(result: &GenerationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("  {}\n", style("Generation Summary").bold().cyan()));
    out.push_str(&format!("  {}\n", style("─".repeat(RULE_WIDTH)).dim()));
    out.push_str(&summary_row("Questions", &result.total_questions.to_string()));
    out.push_str(&summary_row(
        "Interview Type",
        &title_case(&result.round_type.label()),
    ));
    out.push_str(&summary_row("Difficulty", &title_case(result.difficulty.as_str())));
    out.push_str(&summary_row("AI Model", result.model_name()));

    out
}

/// One question card; `index` is zero-based
pub fn render_question(index: usize, question: &Question) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "  {}  {}  {}\n",
        style(format!(" Question {} ", index + 1)).bold().reverse().cyan(),
        style(&question.category).bold(),
        style(title_case(question.difficulty.as_str())).dim()
    ));
    out.push_str(&format!("  {}\n", style("─".repeat(RULE_WIDTH)).dim()));
    out.push_str(&format!("  {}\n", style(&question.question).bold()));

    if let Some(context) = question.context() {
        out.push('\n');
        out.push_str(&format!("  {} {}\n", style("Context:").blue().bold(), context));
    }

    if !question.follow_up_questions.is_empty() {
        out.push('\n');
        out.push_str(&format!("  {}\n", style("Follow-up Questions:").bold()));
        for follow_up in &question.follow_up_questions {
            out.push_str(&format!("    {} {}\n", style("•").dim(), follow_up));
        }
    }

    if !question.expected_topics.is_empty() {
        out.push('\n');
        let topics: Vec<String> = question
            .expected_topics
            .iter()
            .map(|t| style(format!("[{}]", t)).green().to_string())
            .collect();
        out.push_str(&format!(
            "  {} {}\n",
            style("Expected Topics:").bold(),
            topics.join(" ")
        ));
    }

    out
}

fn summary_row(label: &str, value: &str) -> String {
    format!(
        "  {} {}\n",
        style(format!("{:<16}", format!("{}:", label))).dim(),
        style(value).bold()
    )
}

/// "system design" -> "System Design"
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
