//! Feature configuration resolved once per tokenize/parse invocation
//!
//! The grammar recognized by the scanner and parser is ES5 by default; every
//! ES6-era extension is behind a named flag. Flags are resolved into an
//! immutable `FeatureSet` before any character is scanned and are never
//! mutated afterwards. Unknown option keys fail fast when options arrive as
//! JSON (`ParserOptions::from_json`), so caller typos surface immediately
//! instead of silently parsing with defaults.

use serde::{Deserialize, Serialize};

/// ECMAScript edition selector. `Es6` is shorthand for enabling every
/// recognized feature flag; individual flags opt features in under `Es5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EcmaVersion {
    #[default]
    Es5,
    Es6,
}

impl TryFrom<u8> for EcmaVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Es5),
            6 => Ok(Self::Es6),
            other => Err(format!(
                "Unsupported ECMAScript edition {} (supported: 5, 6)",
                other
            )),
        }
    }
}

impl From<EcmaVersion> for u8 {
    fn from(version: EcmaVersion) -> u8 {
        match version {
            EcmaVersion::Es5 => 5,
            EcmaVersion::Es6 => 6,
        }
    }
}

/// The closed set of recognized ES6-era feature flags.
///
/// Field names use the camelCase wire spelling callers pass in option
/// objects. All flags default to off (plain ES5 grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EcmaFeatures {
    /// `let` and `const` declarations
    pub block_bindings: bool,
    /// Destructuring patterns in binding and assignment positions
    pub destructuring: bool,
    /// `function*` declarations/expressions and `yield`
    pub generators: bool,
    /// Arrow function expressions
    pub arrow_functions: bool,
    /// Template literals and tagged templates
    pub template_strings: bool,
    /// `for-of` statements
    pub for_of: bool,
    /// Spread elements in call arguments and array literals
    pub spread: bool,
    /// Rest parameters (`...name` in parameter lists)
    pub rest_params: bool,
    /// Default parameter values
    pub default_params: bool,
    /// `0b`/`0B` binary numeric literals
    pub binary_literals: bool,
    /// `0o`/`0O` octal numeric literals
    pub octal_literals: bool,
    /// Regular-expression `u` flag
    pub regex_u_flag: bool,
    /// Regular-expression `y` flag
    pub regex_y_flag: bool,
    /// `return` at the top level of a program
    pub global_return: bool,
}

impl EcmaFeatures {
    /// Every flag enabled, as implied by the es6 edition selector
    pub fn all() -> Self {
        Self {
            block_bindings: true,
            destructuring: true,
            generators: true,
            arrow_functions: true,
            template_strings: true,
            for_of: true,
            spread: true,
            rest_params: true,
            default_params: true,
            binary_literals: true,
            octal_literals: true,
            regex_u_flag: true,
            regex_y_flag: true,
            global_return: true,
        }
    }
}

/// Named accessor keys for `FeatureSet::is_enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    BlockBindings,
    Destructuring,
    Generators,
    ArrowFunctions,
    TemplateStrings,
    ForOf,
    Spread,
    RestParams,
    DefaultParams,
    BinaryLiterals,
    OctalLiterals,
    RegexUFlag,
    RegexYFlag,
    GlobalReturn,
}

/// Immutable, fully-resolved feature configuration shared by one
/// scanner/parser pair. Constructed once, read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    features: EcmaFeatures,
}

impl FeatureSet {
    /// Resolve the edition selector and individual flags into a fixed set
    pub fn resolve(version: EcmaVersion, features: EcmaFeatures) -> Self {
        let features = match version {
            EcmaVersion::Es5 => features,
            EcmaVersion::Es6 => EcmaFeatures::all(),
        };
        Self { features }
    }

    /// Baseline ES5 set with every extension off
    pub fn es5() -> Self {
        Self {
            features: EcmaFeatures::default(),
        }
    }

    /// Read-only flag accessor
    pub fn is_enabled(&self, feature: Feature) -> bool {
        let f = &self.features;
        match feature {
            Feature::BlockBindings => f.block_bindings,
            Feature::Destructuring => f.destructuring,
            Feature::Generators => f.generators,
            Feature::ArrowFunctions => f.arrow_functions,
            Feature::TemplateStrings => f.template_strings,
            Feature::ForOf => f.for_of,
            Feature::Spread => f.spread,
            Feature::RestParams => f.rest_params,
            Feature::DefaultParams => f.default_params,
            Feature::BinaryLiterals => f.binary_literals,
            Feature::OctalLiterals => f.octal_literals,
            Feature::RegexUFlag => f.regex_u_flag,
            Feature::RegexYFlag => f.regex_y_flag,
            Feature::GlobalReturn => f.global_return,
        }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::es5()
    }
}

/// Options accepted by both `tokenize` and `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ParserOptions {
    /// ECMAScript edition (5 or 6)
    pub ecma_version: EcmaVersion,
    /// Individual feature flags
    pub ecma_features: EcmaFeatures,
    /// Attach `{start, end}` line/column pairs to tokens and nodes
    pub loc: bool,
    /// Attach `[start, end)` absolute byte offsets to tokens and nodes
    pub range: bool,
    /// Include comment tokens in tokenize output / collect them in parse
    pub comment: bool,
    /// Have `parse` return the full token sequence alongside the tree
    pub tokens: bool,
}

impl ParserOptions {
    /// Parse options from a JSON object, rejecting unknown keys
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve the edition selector and flags into the immutable set used
    /// for the lifetime of one scanner/parser pair
    pub fn features(&self) -> FeatureSet {
        FeatureSet::resolve(self.ecma_version, self.ecma_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_es5_everything_off() {
        let options = ParserOptions::default();
        let features = options.features();
        assert!(!features.is_enabled(Feature::BlockBindings));
        assert!(!features.is_enabled(Feature::RegexUFlag));
        assert!(!features.is_enabled(Feature::Generators));
        assert!(!options.loc);
        assert!(!options.range);
    }

    #[test]
    fn test_es6_edition_enables_all_flags() {
        let options = ParserOptions {
            ecma_version: EcmaVersion::Es6,
            ..ParserOptions::default()
        };
        let features = options.features();
        assert!(features.is_enabled(Feature::BlockBindings));
        assert!(features.is_enabled(Feature::Destructuring));
        assert!(features.is_enabled(Feature::RegexYFlag));
        assert!(features.is_enabled(Feature::TemplateStrings));
    }

    #[test]
    fn test_individual_flags_under_es5() {
        let json = r#"{"ecmaFeatures": {"blockBindings": true}}"#;
        let options = ParserOptions::from_json(json).unwrap();
        let features = options.features();
        assert!(features.is_enabled(Feature::BlockBindings));
        assert!(!features.is_enabled(Feature::Destructuring));
    }

    #[test]
    fn test_unknown_feature_key_is_rejected() {
        let json = r#"{"ecmaFeatures": {"blockBindigns": true}}"#;
        assert!(ParserOptions::from_json(json).is_err());
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let json = r#"{"locations": true}"#;
        assert!(ParserOptions::from_json(json).is_err());
    }

    #[test]
    fn test_unsupported_edition_is_rejected() {
        let json = r#"{"ecmaVersion": 7}"#;
        assert!(ParserOptions::from_json(json).is_err());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{"ecmaFeatures": {"regexUFlag": true, "regexYFlag": true}, "loc": true, "range": true}"#;
        let options = ParserOptions::from_json(json).unwrap();
        assert!(options.features().is_enabled(Feature::RegexUFlag));
        assert!(options.features().is_enabled(Feature::RegexYFlag));
        assert!(options.loc && options.range);
    }
}
