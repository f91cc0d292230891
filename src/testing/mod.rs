//! # Test Cases
//!
//! Evaluates executed cases against their expectations and runs whole suites.
//!
//! A case passes when its status matches and its body either matches or is
//! not checked. Body comparison ignores every whitespace character on both
//! sides, so `{"a": 1}` and `{"a":1}\n` are equal.

pub mod report;
pub mod runner;

use std::fmt::{self, Display};

use serde::Serialize;

use crate::http::response::ExecutionResult;
use crate::template::TestCase;

/// Outcome of one checked dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Check {
    Pass,
    Fail,
    NotApplicable,
}

impl Check {
    fn from_match(matched: bool) -> Self {
        if matched { Check::Pass } else { Check::Fail }
    }
}

impl Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Check::Pass => "PASS",
            Check::Fail => "FAIL",
            Check::NotApplicable => "N/A",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub status: Check,
    pub body: Check,
    /// Always `Pass` or `Fail`.
    pub overall: Check,
}

impl Verdict {
    fn new(status: Check, body: Check) -> Self {
        let passed = status == Check::Pass && body != Check::Fail;
        Self {
            status,
            body,
            overall: Check::from_match(passed),
        }
    }

    pub fn passed(&self) -> bool {
        self.overall == Check::Pass
    }
}

/// Compare one case's actual outcome with what it expects.
pub fn evaluate(case: &TestCase, result: &ExecutionResult) -> Verdict {
    if result.is_transport_failure() {
        return Verdict::new(Check::Fail, Check::Fail);
    }

    let status = match result.status {
        Some(code) => Check::from_match(code.to_string() == case.expected_status),
        None => Check::Fail,
    };

    let body = match case.expected_body.as_deref() {
        Some(expected) if !expected.trim().is_empty() => {
            Check::from_match(strip_whitespace(&result.body) == strip_whitespace(expected))
        }
        _ => Check::NotApplicable,
    };

    Verdict::new(status, body)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use crate::http::request::RequestSpec;

    fn case(expected_status: &str, expected_body: Option<&str>) -> TestCase {
        TestCase {
            description: String::new(),
            request: RequestSpec::new(HttpMethod::Get, "http://localhost/users/1"),
            expected_status: expected_status.to_string(),
            expected_body: expected_body.map(str::to_string),
        }
    }

    fn ok(status: u16, body: &str) -> ExecutionResult {
        ExecutionResult::received(status, body.to_string(), 3, body.len())
    }

    #[test]
    fn status_match_without_body_expectation_passes() {
        let verdict = evaluate(&case("200", None), &ok(200, "{\"anything\": true}"));

        assert_eq!(verdict.status, Check::Pass);
        assert_eq!(verdict.body, Check::NotApplicable);
        assert!(verdict.passed());
    }

    #[test]
    fn blank_expected_body_is_not_checked() {
        let verdict = evaluate(&case("200", Some("   ")), &ok(200, "whatever"));
        assert_eq!(verdict.body, Check::NotApplicable);
        assert!(verdict.passed());
    }

    #[test]
    fn body_comparison_ignores_all_whitespace() {
        let verdict = evaluate(&case("200", Some("{\"ok\":true}")), &ok(200, "{ \"ok\": true }"));
        assert_eq!(verdict.body, Check::Pass);
        assert!(verdict.passed());

        let verdict = evaluate(&case("200", Some("{\"a\": 1}")), &ok(200, "{\"a\":1}\n"));
        assert!(verdict.passed());

        let verdict = evaluate(&case("201", Some("{\n  \"name\": \"a b\"\n}")), &ok(201, "{\"name\":\"ab\"}"));
        assert_eq!(verdict.body, Check::Pass);
    }

    #[test]
    fn status_mismatch_fails_overall() {
        let verdict = evaluate(&case("404", None), &ok(200, ""));

        assert_eq!(verdict.status, Check::Fail);
        assert!(!verdict.passed());
    }

    #[test]
    fn status_is_compared_as_text() {
        assert!(!evaluate(&case("OK", None), &ok(200, "")).passed());
        assert!(!evaluate(&case("200.0", None), &ok(200, "")).passed());
    }

    #[test]
    fn padded_expected_status_does_not_match() {
        for expected in [" 200", "200 ", " 200 ", "200\n"] {
            let verdict = evaluate(&case(expected, None), &ok(200, ""));
            assert_eq!(verdict.status, Check::Fail, "{expected:?}");
        }
    }

    #[test]
    fn empty_expected_status_never_matches() {
        let verdict = evaluate(&case("", None), &ok(200, ""));
        assert_eq!(verdict.status, Check::Fail);
        assert!(!verdict.passed());
    }

    #[test]
    fn body_mismatch_fails_overall() {
        let verdict = evaluate(&case("200", Some("{\"ok\":true}")), &ok(200, "{\"ok\":false}"));

        assert_eq!(verdict.status, Check::Pass);
        assert_eq!(verdict.body, Check::Fail);
        assert!(!verdict.passed());
    }

    #[test]
    fn transport_failure_fails_every_dimension() {
        let failed = ExecutionResult::transport_failure("Request timed out after 20s", 20_000);

        for expected_body in [None, Some("{}")] {
            let verdict = evaluate(&case("200", expected_body), &failed);
            assert_eq!(verdict.status, Check::Fail);
            assert_eq!(verdict.body, Check::Fail);
            assert_eq!(verdict.overall, Check::Fail);
        }
    }

    #[test]
    fn overall_is_pass_only_when_no_dimension_fails() {
        let results = [ok(200, "x"), ok(500, "x"), ok(200, "y")];
        let cases = [case("200", None), case("200", Some("x")), case("500", Some("x"))];

        for case in &cases {
            for result in &results {
                let verdict = evaluate(case, result);
                let expected = verdict.status == Check::Pass && verdict.body != Check::Fail;
                assert_eq!(verdict.passed(), expected);
                assert_ne!(verdict.overall, Check::NotApplicable);
            }
        }
    }
}
