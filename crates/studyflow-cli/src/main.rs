//! studyflow CLI — grade quiz answers and review study analytics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "Quiz answer grading and study analytics")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question files
    Validate {
        /// Path to a .json question file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Grade an answer to one question
    Grade {
        /// Path to the .json question file
        #[arg(long)]
        questions: PathBuf,

        /// Question ID to grade
        #[arg(long)]
        id: String,

        /// The answer: an option letter (A, B, ...), free text, or for
        /// true/false questions `true`/`false` or `Verdadeiro`/`Falso`
        #[arg(long)]
        answer: Option<String>,

        /// Write the graded question back to the file
        #[arg(long)]
        save: bool,
    },

    /// Show answered questions with answer highlighting
    Review {
        /// Path to a .json question file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Per-tag performance analytics
    Stats {
        /// Path to a .json question file or directory
        #[arg(long)]
        questions: PathBuf,

        /// Time spent studying, in milliseconds
        #[arg(long, default_value = "0")]
        time_spent_ms: u64,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,

        /// Study flow identifier recorded in the report
        #[arg(long)]
        studyflow_id: Option<String>,

        /// Save a JSON report to the output directory
        #[arg(long)]
        save_report: bool,
    },

    /// Create starter config and example question file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyflow=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Grade {
            questions,
            id,
            answer,
            save,
        } => commands::grade::execute(questions, id, answer, save),
        Commands::Review { questions } => commands::review::execute(questions),
        Commands::Stats {
            questions,
            time_spent_ms,
            format,
            studyflow_id,
            save_report,
        } => commands::stats::execute(
            questions,
            time_spent_ms,
            format,
            studyflow_id,
            save_report,
            cli.config,
        ),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
