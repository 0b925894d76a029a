//! Output formatting for the rsig CLI

use crate::cli::args::VerbosityLevel;
use crate::core::player_source::PlayerSource;
use colored::Colorize;
use serde::Serialize;

/// One deciphered signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecipherResult {
    pub signature: String,
    pub deciphered: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Machine-readable report of a run
#[derive(Debug, Clone, Serialize)]
pub struct DecipherReport<'a> {
    pub player_version: &'a str,
    pub program: &'a PlayerSource,
    pub results: &'a [DecipherResult],
}

/// Output formatter for rsig
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("{} {}", "debug:".dimmed(), message);
        }
    }

    /// Print the recovered operation program
    pub fn print_program(&self, version: &str, source: &PlayerSource) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!("{} {}", "player:".bold(), version);
        println!(
            "{} {} ({} operations)",
            "program:".bold(),
            format_program(source),
            source.len()
        );
    }

    /// Print one deciphered signature.
    ///
    /// Results are the payload of the tool and are printed even in quiet mode.
    pub fn print_result(&self, result: &DecipherResult) {
        match &result.url {
            Some(url) => println!("{}", url),
            None => println!("{}", result.deciphered),
        }
        if self.verbosity == VerbosityLevel::Verbose {
            println!("  {} {}", "from".dimmed(), result.signature);
        }
    }

    /// Print a JSON report
    pub fn print_json(&self, report: &DecipherReport<'_>) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }
}

/// Render a program, `(empty)` when it has no operations
pub fn format_program(source: &PlayerSource) -> String {
    if source.is_empty() {
        "(empty)".to_string()
    } else {
        source.to_string()
    }
}
