//! Parsing of the evaluation call's PASS/FAIL reply.
//!
//! Routing asks exactly one question of the reply: does the draft need
//! another pass? [`is_failing_verdict`] answers it with the default
//! [`VerdictMatcher`]; other strategies can be selected without touching the
//! orchestrator.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The token whose presence marks a failing verdict.
pub const FAIL_TOKEN: &str = "FAIL";

/// How the evaluation reply is matched against [`FAIL_TOKEN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictMatcher {
    /// Case-insensitive substring search. Any occurrence of "fail" anywhere
    /// in the reply counts, including "FAILED", "failure" or "not a FAIL".
    #[default]
    Substring,
    /// Case-insensitive whole-word match; "FAIL:" matches, "failure" does not.
    Token,
}

impl VerdictMatcher {
    pub fn is_failing(&self, reply: &str) -> bool {
        static FAIL_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)\bFAIL\b").expect("valid regex")
        });

        match self {
            Self::Substring => reply.to_uppercase().contains(FAIL_TOKEN),
            Self::Token => FAIL_WORD_RE.is_match(reply),
        }
    }
}

/// Whether the evaluation reply asks for an improvement pass.
///
/// A reply containing neither PASS nor FAIL is treated as passing.
pub fn is_failing_verdict(reply: &str) -> bool {
    VerdictMatcher::default().is_failing(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_verdicts() {
        assert!(is_failing_verdict("FAIL"));
        assert!(!is_failing_verdict("PASS"));
    }

    #[test]
    fn case_insensitive() {
        assert!(is_failing_verdict("fail"));
        assert!(is_failing_verdict("Fail."));
    }

    #[test]
    fn verdict_with_explanation() {
        assert!(is_failing_verdict("FAIL: too short"));
        assert!(is_failing_verdict("The post is decent.\n\nVerdict: FAIL"));
    }

    #[test]
    fn unrecognized_reply_passes() {
        assert!(!is_failing_verdict(""));
        assert!(!is_failing_verdict("Looks good to me."));
    }

    #[test]
    fn substring_matches_inside_other_words() {
        // Known fragility of the default strategy.
        assert!(is_failing_verdict("PASS - nothing here would cause it to fail"));
        assert!(is_failing_verdict("PASS (no failures found)"));
    }

    #[test]
    fn token_matcher_requires_whole_word() {
        let matcher = VerdictMatcher::Token;
        assert!(matcher.is_failing("FAIL: too short"));
        assert!(matcher.is_failing("verdict: fail"));
        assert!(!matcher.is_failing("PASS (no failures found)"));
        assert!(!matcher.is_failing("PASS"));
    }

    #[test]
    fn matcher_deserializes_from_snake_case() {
        let matcher: VerdictMatcher = serde_json::from_str(r#""token""#).unwrap();
        assert_eq!(matcher, VerdictMatcher::Token);
    }
}
