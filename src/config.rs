//! Replacement rules and rule-set loading.
//!
//! A [`ReplacementRule`] is a configuration record describing one migration:
//! the literal trigger substrings and their replacement symbol, an optional
//! structural handler template and its canonical replacement, the symbols
//! the file must import as a result, and the module they come from.
//!
//! Rule sets are loaded from a JSON file, or built in: [`RuleSet::builtin`]
//! ships the two image-path rules this tool was written for, so the common
//! case needs no rules file at all.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RefitError;

// ============================================================================
// Replacement Rule
// ============================================================================

/// One migration rule: what to look for, what to substitute, what the file
/// must import afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Short name used in reports and logs.
    pub name: String,

    /// Literal substrings whose presence triggers the rule. Each is
    /// replaced, in both its single- and double-quoted forms, by the bare
    /// replacement symbol.
    pub trigger_literals: Vec<String>,

    /// Sentinel symbol whose presence marks the file as already migrated.
    /// Defaults to the replacement symbol when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,

    /// Opt out of sentinel guarding: the rule applies whenever a trigger is
    /// present, regardless of prior state. Use only for rules whose rewrite
    /// consumes its own trigger.
    #[serde(default)]
    pub unconditional: bool,

    /// The named constant substituted for the trigger literals.
    pub replacement_symbol: String,

    /// Structural pattern template, e.g.
    /// `onError={(e) => { (e.target as HTMLImageElement).src = $SYMBOL; }}`.
    /// `$SYMBOL` stands for the replacement symbol; whitespace in the
    /// template matches any run of whitespace in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_template: Option<String>,

    /// Canonical short form replacing a structural match, e.g.
    /// `onError={handleImageError}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_replacement: Option<String>,

    /// Symbols the file must import once the rule has been applied.
    pub required_symbols: Vec<String>,

    /// Module the symbols come from, relative to the source root
    /// (e.g. `utils/imageUtils`). The per-file import path is derived from
    /// this and the file's depth below the root.
    pub module: String,

    /// File-name suffix this rule applies to (e.g. `.tsx`).
    pub suffix: String,
}

impl ReplacementRule {
    /// The sentinel guarding this rule, or `None` for unconditional rules.
    pub fn effective_sentinel(&self) -> Option<&str> {
        if self.unconditional {
            None
        } else {
            Some(
                self.sentinel
                    .as_deref()
                    .unwrap_or(self.replacement_symbol.as_str()),
            )
        }
    }

    /// Validate internal consistency of the rule.
    pub fn validate(&self) -> Result<(), RefitError> {
        if self.name.is_empty() {
            return Err(RefitError::invalid_rules("rule name must not be empty"));
        }
        if self.trigger_literals.is_empty() || self.trigger_literals.iter().any(|t| t.is_empty()) {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': trigger literals must be present and non-empty",
                self.name
            )));
        }
        if self.replacement_symbol.is_empty() {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': replacement symbol must not be empty",
                self.name
            )));
        }
        if self.handler_template.is_some() != self.handler_replacement.is_some() {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': handler template and replacement must be given together",
                self.name
            )));
        }
        if self.required_symbols.is_empty() {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': at least one required symbol is needed",
                self.name
            )));
        }
        if self.module.is_empty() {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': module must not be empty",
                self.name
            )));
        }
        if !self.suffix.starts_with('.') {
            return Err(RefitError::invalid_rules(format!(
                "rule '{}': suffix must start with '.', got '{}'",
                self.name, self.suffix
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Rule Set
// ============================================================================

/// An ordered collection of replacement rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<ReplacementRule>,
}

impl RuleSet {
    /// Load and validate a rule set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RefitError> {
        let raw = fs::read_to_string(path).map_err(|e| RefitError::access(path, e))?;
        let rules: Vec<ReplacementRule> = serde_json::from_str(&raw).map_err(|e| {
            RefitError::invalid_rules(format!("{}: {}", path.display(), e))
        })?;
        let set = RuleSet { rules };
        set.validate()?;
        Ok(set)
    }

    /// Validate every rule in the set.
    pub fn validate(&self) -> Result<(), RefitError> {
        if self.rules.is_empty() {
            return Err(RefitError::invalid_rules("rule set is empty"));
        }
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }

    /// Distinct file-name suffixes across all rules, in first-seen order.
    pub fn suffixes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.suffix.as_str()) {
                seen.push(&rule.suffix);
            }
        }
        seen
    }

    /// Rules applicable to a given file name.
    pub fn rules_for(&self, file_name: &str) -> Vec<&ReplacementRule> {
        self.rules
            .iter()
            .filter(|r| file_name.ends_with(&r.suffix))
            .collect()
    }

    /// The built-in rule set: the default-avatar and default-book-cover
    /// image migrations.
    ///
    /// The avatar rule is unconditional because its rewrite consumes its own
    /// trigger; the book rule is guarded by its replacement symbol.
    pub fn builtin() -> Self {
        // Both rules collapse the same inline shape, differing only in the
        // assigned symbol and the named handler.
        const IMAGE_ERROR_TEMPLATE: &str =
            "onError={(e) => { (e.target as HTMLImageElement).src = $SYMBOL; }}";

        RuleSet {
            rules: vec![
                ReplacementRule {
                    name: "default-avatar".to_string(),
                    trigger_literals: vec!["/uploads/profiles/default-avatar.png".to_string()],
                    sentinel: None,
                    unconditional: true,
                    replacement_symbol: "DEFAULT_AVATAR".to_string(),
                    handler_template: Some(IMAGE_ERROR_TEMPLATE.to_string()),
                    handler_replacement: Some("onError={handleImageError}".to_string()),
                    required_symbols: vec![
                        "DEFAULT_AVATAR".to_string(),
                        "handleImageError".to_string(),
                    ],
                    module: "utils/imageUtils".to_string(),
                    suffix: ".tsx".to_string(),
                },
                ReplacementRule {
                    name: "default-book-cover".to_string(),
                    trigger_literals: vec!["/uploads/books/default-book.png".to_string()],
                    sentinel: Some("DEFAULT_BOOK_COVER".to_string()),
                    unconditional: false,
                    replacement_symbol: "DEFAULT_BOOK_COVER".to_string(),
                    handler_template: Some(IMAGE_ERROR_TEMPLATE.to_string()),
                    handler_replacement: Some("onError={handleBookImageError}".to_string()),
                    required_symbols: vec![
                        "DEFAULT_BOOK_COVER".to_string(),
                        "handleBookImageError".to_string(),
                    ],
                    module: "utils/imageUtils".to_string(),
                    suffix: ".tsx".to_string(),
                },
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
