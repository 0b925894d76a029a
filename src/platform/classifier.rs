//! Structural classification of scrambling helper functions
//!
//! Helpers are anonymous, minified object members whose names change with
//! every player release, so they are recognised by shape instead of by name.
//! Classification is driven by an ordered table of [`ShapeRule`]s; the first
//! rule whose predicate accepts a definition of the helper decides its kind.

use crate::core::operation::OperationKind;
use crate::error::RsigError;
use crate::platform::splitter::{call_identifier, call_regex};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A helper definition found in the player script, `name:function(params){body}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperDefinition {
    pub params: Vec<String>,
    pub body: String,
}

/// Structural test applied to a helper definition
pub type ShapePredicate = fn(&HelperDefinition) -> bool;

/// One entry of the classification table
#[derive(Debug, Clone, Copy)]
pub struct ShapeRule {
    pub kind: OperationKind,
    pub name: &'static str,
    pub predicate: ShapePredicate,
}

impl ShapeRule {
    pub fn matches(&self, definition: &HelperDefinition) -> bool {
        (self.predicate)(definition)
    }
}

/// Default table, in priority order
pub const DEFAULT_RULES: [ShapeRule; 3] = [
    ShapeRule {
        kind: OperationKind::Reverse,
        name: "single-parameter",
        predicate: is_reverse_shape,
    },
    ShapeRule {
        kind: OperationKind::Slice,
        name: "sub-selection",
        predicate: is_slice_shape,
    },
    ShapeRule {
        kind: OperationKind::Swap,
        name: "temp-swap",
        predicate: is_swap_shape,
    },
];

/// Reverse: exactly one parameter
pub fn is_reverse_shape(definition: &HelperDefinition) -> bool {
    definition.params.len() == 1
}

/// Slice: two parameters, body sub-selects the first one using the second,
/// e.g. `a.splice(0,b)` or `return a.slice(b)`
pub fn is_slice_shape(definition: &HelperDefinition) -> bool {
    let [target, amount] = definition.params.as_slice() else {
        return false;
    };

    let body = definition.body.trim_start();
    let body = strip_keyword(body, "return").unwrap_or(body);

    let Some(rest) = strip_ident(body, target) else {
        return false;
    };
    let Some(rest) = rest.trim_start().strip_prefix('.') else {
        return false;
    };
    let Some((method, rest)) = take_ident(rest.trim_start()) else {
        return false;
    };
    if !matches!(method, "splice" | "slice" | "substr" | "substring") {
        return false;
    }
    let Some(args) = rest.trim_start().strip_prefix('(') else {
        return false;
    };

    let args = args.split(')').next().unwrap_or_default();
    args.split(|c: char| !is_ident_char(c)).any(|token| token == amount.as_str())
}

/// Swap: two parameters, element 0 captured into a temporary before the
/// elements are reassigned, e.g. `var c=a[0];a[0]=a[b%a.length];a[b]=c`
pub fn is_swap_shape(definition: &HelperDefinition) -> bool {
    let [target, _] = definition.params.as_slice() else {
        return false;
    };

    let body = definition.body.trim_start();
    let Some(rest) = ["var", "let", "const"]
        .iter()
        .find_map(|keyword| strip_keyword(body, keyword))
    else {
        return false;
    };
    let Some((_temp, rest)) = take_ident(rest) else {
        return false;
    };
    let Some(rest) = rest.trim_start().strip_prefix('=') else {
        return false;
    };
    let Some(rest) = strip_ident(rest.trim_start(), target) else {
        return false;
    };

    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    compact.starts_with("[0]") && compact[3..].contains(&format!("{}[0]=", target))
}

/// Mapping from helper identifier to operation kind.
///
/// Holds at most one identifier per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationMap {
    bindings: HashMap<String, OperationKind>,
}

impl ClassificationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `identifier` to `kind` unless that kind is already bound
    pub fn bind(&mut self, identifier: &str, kind: OperationKind) -> bool {
        if self.identifier_for(kind).is_some() {
            return false;
        }
        self.bindings.insert(identifier.to_string(), kind);
        true
    }

    pub fn kind_of(&self, identifier: &str) -> Option<OperationKind> {
        self.bindings.get(identifier).copied()
    }

    pub fn identifier_for(&self, kind: OperationKind) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == kind)
            .map(|(identifier, _)| identifier.as_str())
    }

    /// Whether every kind in `kinds` has an identifier
    pub fn covers(&self, kinds: &[OperationKind]) -> bool {
        kinds.iter().all(|kind| self.identifier_for(*kind).is_some())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Classifies helper identifiers against the whole player script
#[derive(Debug, Clone)]
pub struct OperationClassifier {
    rules: Vec<ShapeRule>,
}

impl OperationClassifier {
    /// Create a classifier with the default rule table
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    /// Create a classifier with a custom rule table, in priority order
    pub fn with_rules(rules: Vec<ShapeRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ShapeRule] {
        &self.rules
    }

    /// Build the classification map for the identifiers called by `statements`
    pub fn classify(
        &self,
        script: &str,
        statements: &[&str],
    ) -> Result<ClassificationMap, RsigError> {
        let call_regex = call_regex()?;
        let kinds: Vec<OperationKind> = self.rules.iter().map(|rule| rule.kind).collect();
        let mut map = ClassificationMap::new();
        let mut seen = HashSet::new();

        for &statement in statements {
            if map.covers(&kinds) {
                break;
            }

            let Some(identifier) = call_identifier(&call_regex, statement) else {
                continue;
            };
            if !seen.insert(identifier) {
                continue;
            }

            match self.classify_identifier(script, identifier)? {
                Some(kind) => {
                    if map.bind(identifier, kind) {
                        debug!("Classified {} as {}", identifier, kind);
                    } else {
                        debug!(
                            "{} looks like {} but that kind is already bound",
                            identifier, kind
                        );
                    }
                }
                None => debug!("Could not classify {}", identifier),
            }
        }

        Ok(map)
    }

    /// Kind of the first rule accepting any definition of `identifier`
    pub fn classify_identifier(
        &self,
        script: &str,
        identifier: &str,
    ) -> Result<Option<OperationKind>, RsigError> {
        let definitions = find_helper_definitions(script, identifier)?;
        if definitions.is_empty() {
            return Ok(None);
        }

        Ok(self
            .rules
            .iter()
            .find(|rule| definitions.iter().any(|definition| rule.matches(definition)))
            .map(|rule| rule.kind))
    }
}

impl Default for OperationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Find every `identifier:function(params){body}` definition in the script
pub fn find_helper_definitions(
    script: &str,
    identifier: &str,
) -> Result<Vec<HelperDefinition>, RsigError> {
    let helper_regex = Regex::new(&format!(
        r#"(?:^|[^a-zA-Z0-9$_.]){}\s*:\s*function\s*\(([^)]*)\)\s*\{{([^}}]*)\}}"#,
        regex::escape(identifier)
    ))?;

    Ok(helper_regex
        .captures_iter(script)
        .filter_map(|captures| {
            let params = captures.get(1)?.as_str();
            let body = captures.get(2)?.as_str();
            Some(HelperDefinition {
                params: params
                    .split(',')
                    .map(str::trim)
                    .filter(|param| !param.is_empty())
                    .map(str::to_string)
                    .collect(),
                body: body.to_string(),
            })
        })
        .collect())
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Strip `ident` if it is a whole identifier at the start of `s`
fn strip_ident<'a>(s: &'a str, ident: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(ident)?;
    match rest.chars().next() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(rest),
    }
}

/// Strip a keyword followed by whitespace, returning the trimmed rest
fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Split a leading identifier off `s`
fn take_ident(s: &str) -> Option<(&str, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some((&s[..end], &s[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELPERS: &str = r#"var Xy={rv:function(a){a.reverse()},
sl:function(a,b){a.splice(0,b)},
sw:function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}};"#;

    fn definition(params: &[&str], body: &str) -> HelperDefinition {
        HelperDefinition {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_find_helper_definitions() {
        let definitions = find_helper_definitions(HELPERS, "sw").unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].params, vec!["a", "b"]);
        assert!(definitions[0].body.starts_with("var c=a[0]"));

        assert!(find_helper_definitions(HELPERS, "zz").unwrap().is_empty());
        // "w" must not match inside "sw"
        assert!(find_helper_definitions(HELPERS, "w").unwrap().is_empty());
    }

    #[test]
    fn test_reverse_shape() {
        assert!(is_reverse_shape(&definition(&["a"], "a.reverse()")));
        assert!(!is_reverse_shape(&definition(&["a", "b"], "a.reverse()")));
    }

    #[test]
    fn test_slice_shape() {
        assert!(is_slice_shape(&definition(&["a", "b"], "a.splice(0,b)")));
        assert!(is_slice_shape(&definition(&["a", "b"], "return a.slice(b)")));
        assert!(is_slice_shape(&definition(&["x", "n"], " x.substr( n )")));
        // Wrong receiver or operand
        assert!(!is_slice_shape(&definition(&["a", "b"], "b.splice(0,a)")));
        assert!(!is_slice_shape(&definition(&["a", "b"], "a.splice(0,1)")));
        assert!(!is_slice_shape(&definition(&["a"], "a.splice(0,1)")));
        assert!(!is_slice_shape(&definition(&["a", "b"], "var c=a[0];a[0]=a[b]")));
    }

    #[test]
    fn test_swap_shape() {
        assert!(is_swap_shape(&definition(
            &["a", "b"],
            "var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c"
        )));
        assert!(is_swap_shape(&definition(
            &["a", "b"],
            "let t = a[ 0 ]; a[0] = a[b]; a[b] = t"
        )));
        // Temporary captured but nothing reassigned
        assert!(!is_swap_shape(&definition(&["a", "b"], "var c=a[0];return c")));
        // Captures another element
        assert!(!is_swap_shape(&definition(&["a", "b"], "var c=a[1];a[0]=a[b]")));
        assert!(!is_swap_shape(&definition(&["a", "b"], "a.splice(0,b)")));
    }

    #[test]
    fn test_classify() {
        let statements = ["Xy.sw(a,3)", "Xy.sl(a,2)", "Xy.rv(a,45)"];
        let map = OperationClassifier::new().classify(HELPERS, &statements).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.kind_of("rv"), Some(OperationKind::Reverse));
        assert_eq!(map.kind_of("sl"), Some(OperationKind::Slice));
        assert_eq!(map.kind_of("sw"), Some(OperationKind::Swap));
        assert_eq!(map.identifier_for(OperationKind::Swap), Some("sw"));
    }

    #[test]
    fn test_classify_leaves_unknown_out() {
        let statements = ["Xy.rv(a)", "Xy.nope(a,1)", "a=a"];
        let map = OperationClassifier::new().classify(HELPERS, &statements).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.kind_of("nope"), None);
    }

    #[test]
    fn test_first_binding_per_kind_wins() {
        let script = r#"var Xy={r1:function(a){a.reverse()},r2:function(a){a.reverse()}};"#;
        let statements = ["Xy.r1(a)", "Xy.r2(a)"];
        let map = OperationClassifier::new().classify(script, &statements).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.kind_of("r1"), Some(OperationKind::Reverse));
        assert_eq!(map.kind_of("r2"), None);
    }

    #[test]
    fn test_priority_order() {
        // Two definitions with the same name: the reverse rule is tested first
        let script = r#"var P={h:function(a,b){a.splice(0,b)}};var Q={h:function(a){a.reverse()}};"#;
        let kind = OperationClassifier::new().classify_identifier(script, "h").unwrap();
        assert_eq!(kind, Some(OperationKind::Reverse));
    }

    #[test]
    fn test_custom_rules() {
        fn never(_: &HelperDefinition) -> bool {
            false
        }
        let classifier = OperationClassifier::with_rules(vec![ShapeRule {
            kind: OperationKind::Reverse,
            name: "never",
            predicate: never,
        }]);
        let kind = classifier.classify_identifier(HELPERS, "rv").unwrap();
        assert_eq!(kind, None);
        assert_eq!(classifier.rules().len(), 1);
    }
}
