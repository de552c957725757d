//! Textual substitution passes.
//!
//! Two independent passes run over matched content:
//!
//! 1. **Literal pass**: every occurrence of a trigger literal, in both its
//!    single- and double-quoted string forms, becomes the bare replacement
//!    symbol (a named constant, so no surrounding quotes).
//! 2. **Structural pass**: the rule's handler template, compiled to a regex
//!    that tolerates whitespace variation between tokens, is collapsed to
//!    its canonical short form. A shape that differs in any other way (an
//!    extra statement inside the callback, say) does not match and is left
//!    alone; the literal pass still applies.
//!
//! Replacement is purely textual, not syntax-aware. A trigger that happens
//! to occur inside a comment or as a substring of an unrelated identifier
//! is rewritten too; that is accepted behavior for a one-shot migration,
//! not something this module tries to detect.

use regex::Regex;
use tracing::warn;

use crate::config::ReplacementRule;
use crate::error::RefitError;

/// Placeholder in handler templates standing for the replacement symbol.
const SYMBOL_PLACEHOLDER: &str = "$SYMBOL";

// ============================================================================
// Rewrite Outcome
// ============================================================================

/// Result of running one rule's substitutions over file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The transformed text.
    pub text: String,
    /// Number of quoted literal occurrences replaced.
    pub literal_count: usize,
    /// Number of structural handler shapes collapsed.
    pub handler_count: usize,
    /// True when the handler shape's leading tokens are still present after
    /// the structural pass: the pattern partially matched but the shape
    /// differed. Non-fatal; literal replacement and import reconciliation
    /// proceed regardless.
    pub partial_handler: bool,
}

// ============================================================================
// Literal Pass
// ============================================================================

/// Replace each quoted form of each trigger literal with the bare symbol.
pub fn apply_literals(content: &str, trigger_literals: &[String], symbol: &str) -> (String, usize) {
    let mut text = content.to_string();
    let mut count = 0;
    for literal in trigger_literals {
        for quoted in [format!("'{}'", literal), format!("\"{}\"", literal)] {
            count += text.matches(quoted.as_str()).count();
            text = text.replace(quoted.as_str(), symbol);
        }
    }
    (text, count)
}

// ============================================================================
// Structural Pass
// ============================================================================

/// Compile a handler template into a whitespace-tolerant regex.
///
/// Every non-whitespace character is matched literally; each whitespace run
/// in the template matches any run of whitespace (including newlines) in the
/// source, and may be empty. A literal `;` is optional, so single-statement
/// callbacks with or without the trailing semicolon both match. `$SYMBOL`
/// expands to the rule's replacement symbol.
pub fn compile_handler_pattern(template: &str, symbol: &str) -> Result<Regex, RefitError> {
    let mut pattern = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with(SYMBOL_PLACEHOLDER) {
            pattern.push_str(&regex::escape(symbol));
            rest = &rest[SYMBOL_PLACEHOLDER.len()..];
        } else if c.is_whitespace() {
            pattern.push_str(r"\s*");
            rest = rest.trim_start();
        } else if c == ';' {
            pattern.push_str(";?");
            rest = &rest[1..];
        } else {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            rest = &rest[c.len_utf8()..];
        }
    }

    Regex::new(&pattern).map_err(|e| {
        RefitError::internal(format!("handler template compiled to bad regex: {}", e))
    })
}

/// The template's leading run of non-whitespace characters, used to detect
/// partial matches left behind after the structural pass.
fn template_head(template: &str) -> &str {
    template
        .split_whitespace()
        .next()
        .unwrap_or(template)
}

// ============================================================================
// Rule Application
// ============================================================================

/// Run one rule's literal and structural passes over file content.
///
/// The caller is expected to have checked [`ReplacementRule::applies`]
/// first; this function performs no I/O and no match-policy decisions.
pub fn rewrite(content: &str, rule: &ReplacementRule) -> Result<Rewritten, RefitError> {
    let (mut text, literal_count) =
        apply_literals(content, &rule.trigger_literals, &rule.replacement_symbol);

    let mut handler_count = 0;
    let mut partial_handler = false;

    if let (Some(template), Some(replacement)) =
        (&rule.handler_template, &rule.handler_replacement)
    {
        let pattern = compile_handler_pattern(template, &rule.replacement_symbol)?;
        handler_count = pattern.find_iter(&text).count();
        if handler_count > 0 {
            text = pattern.replace_all(&text, replacement.as_str()).into_owned();
        }

        // A leftover head token means an inline callback is still present
        // but its body did not match the shape. Leave it; warn only.
        let head = template_head(template);
        if !head.is_empty() && text.contains(head) {
            partial_handler = true;
            warn!(
                rule = rule.name.as_str(),
                "handler shape present but not matched exactly; left unchanged"
            );
        }
    }

    Ok(Rewritten {
        text,
        literal_count,
        handler_count,
        partial_handler,
    })
}

// ============================================================================
// Tests
// ============================================================================
