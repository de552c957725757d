//! Applies-decision policies for replacement rules.
//!
//! Two policies exist:
//!
//! - **Unconditional**: the rule applies whenever a trigger literal is
//!   present, regardless of prior state.
//! - **Guarded**: the rule applies only when a trigger literal is present
//!   AND the sentinel symbol is absent. The sentinel marks a file already
//!   migrated, which makes the rule idempotent across runs.
//!
//! Guarded is the default; unconditional rules risk re-editing files that
//! were already migrated through a different path, so a rule must opt into
//! it explicitly.

use crate::config::ReplacementRule;

/// How a rule decides whether it applies to a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Applies iff any trigger literal is present.
    Unconditional,
    /// Applies iff any trigger literal is present and the sentinel is absent.
    Guarded { sentinel: String },
}

impl MatchPolicy {
    /// Evaluate the applies-decision against file content.
    pub fn applies(&self, content: &str, trigger_literals: &[String]) -> bool {
        let triggered = trigger_literals.iter().any(|t| content.contains(t.as_str()));
        match self {
            MatchPolicy::Unconditional => triggered,
            MatchPolicy::Guarded { sentinel } => triggered && !content.contains(sentinel.as_str()),
        }
    }
}

impl ReplacementRule {
    /// The match policy configured for this rule.
    pub fn policy(&self) -> MatchPolicy {
        match self.effective_sentinel() {
            Some(sentinel) => MatchPolicy::Guarded {
                sentinel: sentinel.to_string(),
            },
            None => MatchPolicy::Unconditional,
        }
    }

    /// Whether this rule applies to the given file content.
    pub fn applies(&self, content: &str) -> bool {
        self.policy().applies(content, &self.trigger_literals)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;

    fn triggers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    mod unconditional_policy {
        use super::*;

        #[test]
        fn applies_when_trigger_present() {
            let policy = MatchPolicy::Unconditional;
            assert!(policy.applies("src=\"/img/default.png\"", &triggers(&["/img/default.png"])));
        }

        #[test]
        fn does_not_apply_without_trigger() {
            let policy = MatchPolicy::Unconditional;
            assert!(!policy.applies("nothing to see", &triggers(&["/img/default.png"])));
        }

        #[test]
        fn any_of_several_triggers_suffices() {
            let policy = MatchPolicy::Unconditional;
            let t = triggers(&["/img/a.png", "/img/b.png"]);
            assert!(policy.applies("uses /img/b.png only", &t));
        }
    }

    mod guarded_policy {
        use super::*;

        #[test]
        fn applies_when_trigger_present_and_sentinel_absent() {
            let policy = MatchPolicy::Guarded {
                sentinel: "DEFAULT_IMAGE".to_string(),
            };
            assert!(policy.applies("src='/img/default.png'", &triggers(&["/img/default.png"])));
        }

        #[test]
        fn sentinel_presence_suppresses_match() {
            let policy = MatchPolicy::Guarded {
                sentinel: "DEFAULT_IMAGE".to_string(),
            };
            let content = "const x = DEFAULT_IMAGE; // was /img/default.png";
            assert!(!policy.applies(content, &triggers(&["/img/default.png"])));
        }
    }

    mod rule_policies {
        use super::*;

        #[test]
        fn builtin_avatar_rule_is_unconditional() {
            let set = RuleSet::builtin();
            assert_eq!(set.rules[0].policy(), MatchPolicy::Unconditional);
        }

        #[test]
        fn builtin_book_rule_is_guarded() {
            let set = RuleSet::builtin();
            assert_eq!(
                set.rules[1].policy(),
                MatchPolicy::Guarded {
                    sentinel: "DEFAULT_BOOK_COVER".to_string()
                }
            );
        }

        #[test]
        fn guarded_book_rule_skips_migrated_file() {
            let set = RuleSet::builtin();
            let migrated =
                "cover = DEFAULT_BOOK_COVER; // /uploads/books/default-book.png kept in a comment";
            assert!(!set.rules[1].applies(migrated));
        }

        #[test]
        fn book_rule_applies_to_fresh_file() {
            let set = RuleSet::builtin();
            let fresh = "src={book.cover || '/uploads/books/default-book.png'}";
            assert!(set.rules[1].applies(fresh));
        }
    }
}
