//! Criterium CLI - compile and try out criteria from the command line.
//!
//! Criteria are read from JSON files. `compile` and `explain` only render;
//! `run` executes against an in-memory repository loaded from a JSON node
//! list, which makes it handy for checking what a query matches.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use criterium_common::types::QueryLanguage;
use std::path::PathBuf;

/// Criteria query compiler.
///
/// Compiles criteria to XPath or JCR-SQL2 and runs them against sample
/// content.
#[derive(Parser)]
#[command(name = "criterium")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Target language override.
#[derive(Clone, Copy, ValueEnum)]
enum Language {
    /// JCR XPath
    Xpath,
    /// JCR-SQL2
    Sql2,
}

impl From<Language> for QueryLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Xpath => QueryLanguage::XPath,
            Language::Sql2 => QueryLanguage::Sql2,
        }
    }
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the statement compiled from a criteria file
    Compile {
        /// Path to the criteria JSON
        criteria: PathBuf,

        /// Override the language named in the file
        #[arg(long, short)]
        language: Option<Language>,
    },

    /// Show the full query descriptor, count query included
    Explain {
        /// Path to the criteria JSON
        criteria: PathBuf,

        /// Override the language named in the file
        #[arg(long, short)]
        language: Option<Language>,
    },

    /// Execute criteria against nodes loaded from a JSON file
    Run {
        /// Path to the criteria JSON
        criteria: PathBuf,

        /// Path to the node list JSON
        #[arg(long, short)]
        data: PathBuf,

        /// Override the language named in the file
        #[arg(long, short)]
        language: Option<Language>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let result = match cli.command {
        Commands::Compile { criteria, language } => {
            commands::compile::run(&criteria, language.map(Into::into), cli.format, cli.quiet)
        }
        Commands::Explain { criteria, language } => {
            commands::explain::run(&criteria, language.map(Into::into), cli.format, cli.quiet)
        }
        Commands::Run {
            criteria,
            data,
            language,
        } => commands::run::run(
            &criteria,
            &data,
            language.map(Into::into),
            cli.format,
            cli.quiet,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
