//! Player script version and location extraction from watch pages

use crate::error::RsigError;
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;
use url::Url;

const PLATFORM_ORIGIN: &str = "https://www.youtube.com";

/// Extract the player script version from a watch page
pub fn extract_player_version(html: &str) -> Result<String, RsigError> {
    let version_patterns = [
        // Legacy: <script src="/yts/jsbin/player-<version>/base.js">
        r#"<script\s*src="/yts/jsbin/player-(.*?)/base\.js"#,
        // Current: /s/player/<version>/player_ias.vflset/en_US/base.js
        r#"/s/player/([a-zA-Z0-9_-]+)/"#,
    ];

    for (i, pattern) in version_patterns.iter().enumerate() {
        let regex = Regex::new(pattern)?;
        if let Some(version) = regex.captures(html).and_then(|captures| captures.get(1)) {
            if !version.as_str().trim().is_empty() {
                debug!("Found player version with pattern {}: {}", i + 1, version.as_str());
                return Ok(version.as_str().to_string());
            }
        }
    }

    Err(RsigError::PlayerVersionNotFound)
}

/// Extract the absolute player script URL from a watch page
pub fn extract_player_js_url(html: &str) -> Result<String, RsigError> {
    let url_patterns = [
        r#""jsUrl":"([^"]+)""#,
        r#"<script\s*src="([^"]+/base\.js)""#,
    ];

    for pattern in url_patterns {
        let regex = Regex::new(pattern)?;
        if let Some(js_url) = regex.captures(html).and_then(|captures| captures.get(1)) {
            // Relative and protocol-relative paths resolve against the platform origin
            let url = Url::parse(PLATFORM_ORIGIN)?.join(js_url.as_str())?;
            return Ok(url.to_string());
        }
    }

    Err(RsigError::PlayerVersionNotFound)
}

/// Content fingerprint usable as a cache key when no version is known.
///
/// Built on `DefaultHasher`, so the value is only stable within one process
/// and must not be persisted.
pub fn script_fingerprint(script: &str) -> String {
    let mut hasher = DefaultHasher::new();
    script.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}
