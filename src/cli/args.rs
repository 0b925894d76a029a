//! Command line argument parsing

use crate::platform::extractor::ExtractionMode;
use crate::platform::parser::ParserOptions;
use crate::platform::sequencer::UnknownCallPolicy;
use crate::utils::cache::{DEFAULT_PLAYER_SOURCE_CAPACITY, DEFAULT_PLAYER_SOURCE_TTL};
use crate::utils::url::DEFAULT_SIGNATURE_PARAM;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Rust Signature Descrambler - Recovers stream signatures from obfuscated player scripts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the player script
    pub script: PathBuf,

    /// Signatures to decipher
    pub signatures: Vec<String>,

    /// Literal key associated with the descrambling function
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,

    /// Function body extraction strategy
    #[arg(long, value_enum, value_name = "MODE")]
    pub extraction: Option<ExtractionArg>,

    /// Fail when a helper call cannot be classified
    #[arg(long)]
    pub strict: bool,

    /// JSON file with parser options
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the recovered operation program
    #[arg(short, long)]
    pub print_program: bool,

    /// Stream URL to substitute each deciphered signature into
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Query parameter carrying the signature in the stream URL
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SIGNATURE_PARAM)]
    pub param: String,

    /// Watch page to read the player version from
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Player version used as cache key
    #[arg(long, value_name = "VERSION")]
    pub player_version: Option<String>,

    /// Lifetime of parsed programs (e.g., 10m, 1h)
    #[arg(long, value_name = "DURATION", default_value = "10m")]
    pub cache_ttl: humantime::Duration,

    /// Maximum number of cached script versions
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PLAYER_SOURCE_CAPACITY)]
    pub cache_capacity: u64,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Function body extraction strategy
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ExtractionArg {
    /// Stop at the first closing brace
    FirstBrace,
    /// Stop at the balancing closing brace
    Balanced,
}

impl From<ExtractionArg> for ExtractionMode {
    fn from(arg: ExtractionArg) -> Self {
        match arg {
            ExtractionArg::FirstBrace => ExtractionMode::FirstBrace,
            ExtractionArg::Balanced => ExtractionMode::Balanced,
        }
    }
}

impl Args {
    /// Get cache TTL as Duration
    pub fn cache_ttl_duration(&self) -> Duration {
        self.cache_ttl.into()
    }

    /// Apply command line flags on top of `options`
    pub fn parser_options(&self, mut options: ParserOptions) -> ParserOptions {
        if let Some(key) = &self.key {
            options.signature_key = key.clone();
        }
        if let Some(extraction) = self.extraction {
            options.extraction = extraction.into();
        }
        if self.strict {
            options.unknown_calls = UnknownCallPolicy::FailFast;
        }
        options
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Default log filter for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            script: PathBuf::new(),
            signatures: Vec::new(),
            key: None,
            extraction: None,
            strict: false,
            config: None,
            print_program: false,
            url: None,
            param: DEFAULT_SIGNATURE_PARAM.to_string(),
            html: None,
            player_version: None,
            cache_ttl: humantime::Duration::from(DEFAULT_PLAYER_SOURCE_TTL),
            cache_capacity: DEFAULT_PLAYER_SOURCE_CAPACITY,
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}
