//! Main entry point for rsig CLI

use anyhow::Context;
use clap::Parser;
use rsig::cli::output::{DecipherReport, DecipherResult, OutputFormatter};
use rsig::cli::{Args, VerbosityLevel};
use rsig::platform::version::{extract_player_version, script_fingerprint};
use rsig::utils::url::apply_signature;
use rsig::{Decipherer, ParserOptions, PlayerSourceParser};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level());
    debug!("Starting rsig with args: {:?}", args);

    let formatter = OutputFormatter::new(args.verbosity_level());

    if let Err(e) = run(&args, &formatter).await {
        formatter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Parse the player script and decipher every requested signature
async fn run(args: &Args, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let start_time = Instant::now();

    // Configure parser
    let options = match &args.config {
        Some(path) => ParserOptions::from_json_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ParserOptions::default(),
    };
    let options = args.parser_options(options);
    debug!("Parser options: {:?}", options);

    let decipherer = Decipherer::new()
        .with_parser(PlayerSourceParser::from_options(&options))
        .with_cache_limits(args.cache_ttl_duration(), args.cache_capacity);

    // Load inputs
    let script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read player script {}", args.script.display()))?;
    let version = resolve_player_version(args, &script).await?;
    info!("Using player version {}", version);

    let source = decipherer
        .player_source(&version, &script)
        .await
        .with_context(|| format!("Failed to parse player script {}", args.script.display()))?;

    if args.print_program && !args.json {
        formatter.print_program(&version, &source);
    }
    if source.is_empty() {
        formatter.warning("No scrambling operations found, signatures pass through unchanged");
    }

    // Decipher signatures
    let mut results = Vec::with_capacity(args.signatures.len());
    for signature in &args.signatures {
        let deciphered = source
            .decipher(signature)
            .with_context(|| format!("Failed to decipher signature {}", signature))?;

        let url = match &args.url {
            Some(stream_url) => Some(apply_signature(stream_url, &args.param, &deciphered)?),
            None => None,
        };

        let result = DecipherResult {
            signature: signature.clone(),
            deciphered,
            url,
        };
        if !args.json {
            formatter.print_result(&result);
        }
        results.push(result);
    }

    if args.json {
        formatter.print_json(&DecipherReport {
            player_version: &version,
            program: source.as_ref(),
            results: &results,
        })?;
    } else {
        formatter.debug(&format!(
            "Deciphered {} signatures in {:?}",
            results.len(),
            start_time.elapsed()
        ));
    }

    Ok(())
}

/// Pick the cache key: explicit version, watch page, or script fingerprint
async fn resolve_player_version(args: &Args, script: &str) -> anyhow::Result<String> {
    if let Some(version) = &args.player_version {
        return Ok(version.clone());
    }

    if let Some(path) = &args.html {
        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read watch page {}", path.display()))?;
        return extract_player_version(&html)
            .with_context(|| format!("No player version in {}", path.display()));
    }

    Ok(script_fingerprint(script))
}

/// Initialize logging system
fn init_logging(verbosity: VerbosityLevel) {
    // RUST_LOG wins over the verbosity flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
