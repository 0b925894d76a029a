//! Locates the top-level descrambling function in a player script

use crate::error::RsigError;
use regex::Regex;
use tracing::debug;

/// Key the player script uses to reference the signature parameter
pub const DEFAULT_SIGNATURE_KEY: &str = "signature";

/// Find the identifier of the function called right after the signature key.
///
/// Matches `"<key>",<identifier>(` anywhere in the script.
pub fn find_entry_function(script: &str, key: &str) -> Result<String, RsigError> {
    let entry_regex = Regex::new(&format!(
        r#"["']{}["']\s*,\s*([a-zA-Z0-9$_]+)\("#,
        regex::escape(key)
    ))?;

    if let Some(captures) = entry_regex.captures(script) {
        if let Some(name) = captures.get(1) {
            debug!("Found entry function: {}", name.as_str());
            return Ok(name.as_str().to_string());
        }
    }

    Err(RsigError::EntryFunctionNotFound {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_entry_function() {
        let script = r#"c&&d.set("signature",Xo(c));"#;
        assert_eq!(find_entry_function(script, "signature").unwrap(), "Xo");
    }

    #[test]
    fn test_find_entry_function_with_space_and_dollar() {
        let script = r#"d.set("signature", $k9(c));"#;
        assert_eq!(find_entry_function(script, "signature").unwrap(), "$k9");
    }

    #[test]
    fn test_find_entry_function_custom_key() {
        let script = r#"d.set("sig",Ab(c));d.set("signature",Xo(c))"#;
        assert_eq!(find_entry_function(script, "sig").unwrap(), "Ab");
    }

    #[test]
    fn test_entry_function_not_found() {
        let err = find_entry_function("var a=1;", "signature").unwrap_err();
        assert!(matches!(err, RsigError::EntryFunctionNotFound { ref key } if key == "signature"));

        // Key present but not followed by a call
        let err = find_entry_function(r#"x("signature",1)"#, "signature").unwrap_err();
        assert!(err.is_parse_failure());
    }
}
