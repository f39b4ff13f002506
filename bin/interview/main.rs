//! Interview Assistant CLI
//!
//! Generate tailored interview questions from a resume and a job
//! description, then render and export them.

mod commands;
mod style;
mod wizard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style as paint;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::commands::{Context, FormArgs, KeyAction, OutputArgs};
use crate::style::print_error;

#[derive(Parser)]
#[command(name = "interview")]
#[command(author, version, about = "Interview Assistant - AI interview questions from a resume")]
struct Cli {
    /// Generator service URL (overrides the config file)
    #[arg(long, global = true, env = "INTERVIEW_SERVER_URL")]
    server_url: Option<String>,

    /// Config file (default: ~/.interview-assistant/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate questions from command-line arguments
    #[command(visible_alias = "gen")]
    Generate {
        #[command(flatten)]
        form: FormArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Only render, do not write an export file
        #[arg(long)]
        no_export: bool,
    },

    /// Fill in the form interactively (default when no command is given)
    Wizard,

    /// Check the form without sending it
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Render a previously exported JSON result
    Show {
        /// JSON file written by `generate --format json`
        file: PathBuf,

        /// Also export it
        #[arg(long)]
        export: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check that the generator service is reachable
    Health,

    /// Manage the cached Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show the effective configuration
    Config,
}

pub fn print_banner() {
    println!();
    println!(
        "  {} {}",
        paint("Interview Assistant").cyan().bold(),
        paint(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!(
        "  {}",
        paint("AI-generated interview questions tailored to a resume").dim()
    );
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        println!();
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.config, cli.server_url)?;

    match cli.command.unwrap_or(Commands::Wizard) {
        Commands::Generate {
            form,
            output,
            no_export,
        } => commands::generate::run(&ctx, form, output, no_export).await,
        Commands::Wizard => wizard::run_generate_wizard(&ctx).await,
        Commands::Validate { form } => commands::validate::run(&ctx, form),
        Commands::Show {
            file,
            export,
            output,
        } => commands::show::run(&ctx, file, export, output),
        Commands::Health => commands::health::run(&ctx).await,
        Commands::Key { action } => commands::key::run(&ctx, action),
        Commands::Config => commands::config::run(&ctx),
    }
}
