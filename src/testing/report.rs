use std::fmt::{self, Display};
use std::io;

use crate::error::StorageError;

use super::runner::{CaseRecord, SuiteReport};

const NOT_CHECKED: &str = "(not checked)";

/// Render the suite summary as plain text.
///
/// Output depends only on the report, so the terminal and a saved file show
/// the same content.
pub fn render_text(report: &SuiteReport) -> String {
    TextReport(report).to_string()
}

/// Plain-text view of a report.
struct TextReport<'a>(&'a SuiteReport);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Suite `{}`: {} total, {} passed, {} failed",
            report.name, report.total, report.passed, report.failed
        )?;

        for (index, record) in report.cases.iter().enumerate() {
            writeln!(f)?;
            write_case(f, index + 1, record)?;
        }
        Ok(())
    }
}

fn write_case(f: &mut fmt::Formatter<'_>, number: usize, record: &CaseRecord) -> fmt::Result {
    let CaseRecord { case, result, verdict } = record;
    let description = if case.description.trim().is_empty() {
        "(no description)"
    } else {
        case.description.as_str()
    };

    writeln!(f, "[{}] #{number} {description}", verdict.overall)?;
    writeln!(f, "  Request:  {} {}", case.request.method, case.request.url)?;
    writeln!(
        f,
        "  Expected: status {}, body {}",
        display_or(&case.expected_status, "(none)"),
        case.expected_body.as_deref().map(single_line).unwrap_or_else(|| NOT_CHECKED.to_string()),
    )?;

    match &result.transport_error {
        Some(error) => writeln!(f, "  Actual:   status {}, error: {error}", result.status_label())?,
        None => writeln!(
            f,
            "  Actual:   status {}, body {} ({} ms, {} bytes)",
            result.status_label(),
            display_or(&single_line(&result.body), "(empty)"),
            result.elapsed_ms,
            result.size_bytes,
        )?,
    }
    writeln!(f, "  Checks:   status {}, body {}", verdict.status, verdict.body)
}

/// Render the report as pretty JSON.
pub fn render_json(report: &SuiteReport) -> Result<String, StorageError> {
    serde_json::to_string_pretty(report).map_err(|source| StorageError::Serialize {
        what: "suite report",
        source,
    })
}

/// Write rendered output to a stream.
pub fn write_report(mut writer: impl io::Write, rendered: &str) -> io::Result<()> {
    writer.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn single_line(text: &str) -> String {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join(" ")
}

fn display_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() { fallback } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;
    use crate::http::request::RequestSpec;
    use crate::http::response::ExecutionResult;
    use crate::template::TestCase;
    use crate::testing::evaluate;

    fn record(description: &str, expected_status: &str, expected_body: Option<&str>, result: ExecutionResult) -> CaseRecord {
        let case = TestCase {
            description: description.to_string(),
            request: RequestSpec::new(HttpMethod::Get, "http://localhost:5000/users/1"),
            expected_status: expected_status.to_string(),
            expected_body: expected_body.map(str::to_string),
        };
        let verdict = evaluate(&case, &result);
        CaseRecord { case, result, verdict }
    }

    fn sample_report() -> SuiteReport {
        let mut report = SuiteReport::new("users");
        report.push(record(
            "fetch user",
            "200",
            Some("{\"id\": 1}"),
            ExecutionResult::received(200, "{\n  \"id\": 1\n}".into(), 7, 13),
        ));
        report.push(record(
            "",
            "404",
            None,
            ExecutionResult::received(200, String::new(), 4, 0),
        ));
        report.push(record(
            "offline",
            "200",
            None,
            ExecutionResult::transport_failure("Connection failed: refused", 1),
        ));
        report
    }

    #[test]
    fn renders_header_and_one_block_per_case() {
        let text = render_text(&sample_report());
        let expected = "\
Suite `users`: 3 total, 1 passed, 2 failed

[PASS] #1 fetch user
  Request:  GET http://localhost:5000/users/1
  Expected: status 200, body {\"id\": 1}
  Actual:   status 200, body { \"id\": 1 } (7 ms, 13 bytes)
  Checks:   status PASS, body PASS

[FAIL] #2 (no description)
  Request:  GET http://localhost:5000/users/1
  Expected: status 404, body (not checked)
  Actual:   status 200, body (empty) (4 ms, 0 bytes)
  Checks:   status FAIL, body N/A

[FAIL] #3 offline
  Request:  GET http://localhost:5000/users/1
  Expected: status 200, body (not checked)
  Actual:   status unavailable, error: Connection failed: refused
  Checks:   status FAIL, body FAIL
";
        assert_eq!(text, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let report = sample_report();
        assert_eq!(render_text(&report), render_text(&report));
    }

    #[test]
    fn empty_report_renders_only_header() {
        let text = render_text(&SuiteReport::new("empty"));
        assert_eq!(text, "Suite `empty`: 0 total, 0 passed, 0 failed\n");
    }

    #[test]
    fn json_keeps_counts_and_order() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 3);
        assert_eq!(value["passed"], 1);
        assert_eq!(value["failed"], 2);
        assert_eq!(value["cases"][0]["case"]["description"], "fetch user");
        assert_eq!(value["cases"][0]["verdict"]["overall"], "PASS");
        assert_eq!(value["cases"][1]["verdict"]["body"], "NOT_APPLICABLE");
        assert_eq!(value["cases"][2]["result"]["status"], serde_json::Value::Null);
    }

    #[test]
    fn write_report_terminates_with_newline() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, "{}").unwrap();
        assert_eq!(buffer, b"{}\n");
    }
}
