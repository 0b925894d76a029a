//! Full parse pipeline: player script to [`PlayerSource`]

use crate::core::player_source::PlayerSource;
use crate::error::RsigError;
use crate::platform::classifier::{OperationClassifier, ShapeRule};
use crate::platform::extractor::{BodyExtractor, ExtractionMode};
use crate::platform::locator::{find_entry_function, DEFAULT_SIGNATURE_KEY};
use crate::platform::sequencer::{OperationSequencer, UnknownCallPolicy};
use crate::platform::splitter::split_statements;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserOptions {
    /// Literal key associated with the entry function
    pub signature_key: String,
    /// Function body extraction strategy
    pub extraction: ExtractionMode,
    /// Handling of calls to unclassified helpers
    pub unknown_calls: UnknownCallPolicy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            signature_key: DEFAULT_SIGNATURE_KEY.to_string(),
            extraction: ExtractionMode::default(),
            unknown_calls: UnknownCallPolicy::default(),
        }
    }
}

impl ParserOptions {
    /// Load options from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RsigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Parses player scripts into operation programs.
///
/// Stateless between calls, so one parser can serve any number of script
/// versions and threads.
#[derive(Debug)]
pub struct PlayerSourceParser {
    signature_key: String,
    extractor: Box<dyn BodyExtractor>,
    classifier: OperationClassifier,
    sequencer: OperationSequencer,
}

impl PlayerSourceParser {
    /// Create a parser with default options
    pub fn new() -> Self {
        Self::from_options(&ParserOptions::default())
    }

    /// Create a parser from options
    pub fn from_options(options: &ParserOptions) -> Self {
        Self {
            signature_key: options.signature_key.clone(),
            extractor: options.extraction.extractor(),
            classifier: OperationClassifier::new(),
            sequencer: OperationSequencer::new(options.unknown_calls),
        }
    }

    /// Set the literal key used to find the entry function
    pub fn with_signature_key(mut self, key: &str) -> Self {
        self.signature_key = key.to_string();
        self
    }

    /// Use a built-in extraction strategy
    pub fn with_extraction(mut self, mode: ExtractionMode) -> Self {
        self.extractor = mode.extractor();
        self
    }

    /// Use a custom extraction strategy
    pub fn with_extractor(mut self, extractor: Box<dyn BodyExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the unknown call policy
    pub fn with_unknown_policy(mut self, policy: UnknownCallPolicy) -> Self {
        self.sequencer = OperationSequencer::new(policy);
        self
    }

    /// Replace the classification table
    pub fn with_rules(mut self, rules: Vec<ShapeRule>) -> Self {
        self.classifier = OperationClassifier::with_rules(rules);
        self
    }

    /// Parse a player script
    pub fn parse(&self, script: &str) -> Result<PlayerSource, RsigError> {
        debug!("Parsing player script ({} bytes)", script.len());

        let entry = find_entry_function(script, &self.signature_key)?;
        let body = self.extractor.extract(script, &entry)?;
        let statements = split_statements(body);
        debug!("Found {} candidate statements in {}", statements.len(), entry);

        let map = self.classifier.classify(script, &statements)?;
        let operations = self.sequencer.sequence(&statements, &map)?;

        let source = PlayerSource::new(operations);
        info!("Parsed descrambling program: {}", source);
        Ok(source)
    }
}

impl Default for PlayerSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a player script with default options
pub fn parse_player_source(script: &str) -> Result<PlayerSource, RsigError> {
    PlayerSourceParser::new().parse(script)
}
