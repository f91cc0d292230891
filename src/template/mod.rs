//! # Templates
//!
//! A template is a saved request, optionally carrying a list of test cases.
//! On disk it is a JSON object:
//!
//! ```json
//! {
//!   "method": "GET",
//!   "url": "http://localhost:5000/users",
//!   "headers": "Accept: application/json",
//!   "body": "",
//!   "testcases": [
//!     { "desc": "first user", "method": "GET", "url": "http://localhost:5000/users/1",
//!       "headers": "", "body": "", "expected_status": "200", "expected_body": "" }
//!   ]
//! }
//! ```
//!
//! Headers are stored as one newline-joined string. A template without test
//! cases prefills a single request; with test cases it is run as a suite.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::environment::Variables;
use crate::error::TemplateError;
use crate::http::builder::header_lines;
use crate::http::method::HttpMethod;
use crate::http::request::RequestSpec;

/// Raw template record as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub testcases: Option<Vec<TestCaseRecord>>,
}

/// Raw test case record as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub expected_status: String,
    #[serde(default)]
    pub expected_body: Option<String>,
}

/// One request paired with its expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub description: String,
    pub request: RequestSpec,
    /// Compared verbatim against the actual status code. Empty never matches.
    pub expected_status: String,
    /// `None` means the body is not checked.
    pub expected_body: Option<String>,
}

/// What a loaded template is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateMode {
    /// No test cases: the template only prefills a single request.
    Prefill(RequestSpec),
    /// Run every case in declaration order.
    Suite(Vec<TestCase>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub mode: TemplateMode,
}

impl Template {
    pub fn from_record(name: &str, record: TemplateRecord, variables: &Variables) -> Result<Self, TemplateError> {
        let cases = record.testcases.unwrap_or_default();
        let mode = if cases.is_empty() {
            let request = request_from_parts(
                &format!("template `{name}`"),
                &record.method,
                &record.url,
                &record.headers,
                &record.body,
                variables,
            )?;
            TemplateMode::Prefill(request)
        } else {
            let cases = cases
                .into_iter()
                .enumerate()
                .map(|(index, case)| test_case_from_record(index, case, variables))
                .collect::<Result<Vec<_>, _>>()?;
            TemplateMode::Suite(cases)
        };

        Ok(Self {
            name: name.to_string(),
            mode,
        })
    }

    /// The test cases to run, or an error when the template only prefills.
    pub fn suite(&self) -> Result<&[TestCase], TemplateError> {
        match &self.mode {
            TemplateMode::Suite(cases) => Ok(cases.as_slice()),
            TemplateMode::Prefill(_) => Err(TemplateError::NoTestCases(self.name.clone())),
        }
    }
}

/// Read and validate a template file.
pub fn load_template(path: &Path, variables: &Variables) -> Result<Template, TemplateError> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => TemplateError::NotFound(path.to_path_buf()),
        _ => TemplateError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let record: TemplateRecord = serde_json::from_str(&raw).map_err(|source| TemplateError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Template::from_record(&name, record, variables)
}

fn test_case_from_record(
    index: usize,
    record: TestCaseRecord,
    variables: &Variables,
) -> Result<TestCase, TemplateError> {
    let location = format!("test case #{}", index + 1);
    let request = request_from_parts(
        &location,
        &record.method,
        &record.url,
        &record.headers,
        &record.body,
        variables,
    )?;
    let expected_body = record
        .expected_body
        .filter(|body| !body.trim().is_empty())
        .map(|body| variables.interpolate(&body));

    Ok(TestCase {
        description: record.desc,
        request,
        expected_status: record.expected_status,
        expected_body,
    })
}

fn request_from_parts(
    location: &str,
    method: &str,
    url: &str,
    headers: &str,
    body: &str,
    variables: &Variables,
) -> Result<RequestSpec, TemplateError> {
    let method: HttpMethod = method.parse().map_err(|reason| TemplateError::InvalidField {
        location: location.to_string(),
        field: "method",
        reason,
    })?;
    let url = variables.interpolate(url.trim());
    if url.is_empty() {
        return Err(TemplateError::InvalidField {
            location: location.to_string(),
            field: "url",
            reason: "URL cannot be empty".to_string(),
        });
    }

    Ok(RequestSpec {
        method,
        url,
        headers: header_lines(&variables.interpolate(headers)),
        body: variables.interpolate(body),
        auth_header: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(raw: &str) -> Result<Template, TemplateError> {
        let record: TemplateRecord = serde_json::from_str(raw).unwrap();
        Template::from_record("users", record, &Variables::new())
    }

    #[test]
    fn template_without_cases_is_prefill() {
        let template = parse(
            r#"{"method":"POST","url":"http://localhost/users","headers":"A: 1\n\nB: 2","body":"{}"}"#,
        )
        .unwrap();

        let TemplateMode::Prefill(request) = template.mode else {
            panic!("expected prefill mode");
        };
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers, vec!["A: 1", "B: 2"]);
        assert_eq!(request.body, "{}");
    }

    #[test]
    fn empty_case_list_is_prefill_not_empty_suite() {
        let template = parse(r#"{"method":"GET","url":"http://localhost","testcases":[]}"#).unwrap();

        assert!(matches!(template.mode, TemplateMode::Prefill(_)));
        assert!(matches!(template.suite(), Err(TemplateError::NoTestCases(name)) if name == "users"));
    }

    #[test]
    fn cases_keep_declaration_order() {
        let template = parse(
            r#"{
                "method": "GET", "url": "http://localhost",
                "testcases": [
                    {"desc": "one", "method": "GET", "url": "http://localhost/1", "expected_status": "200"},
                    {"desc": "two", "method": "delete", "url": "http://localhost/2", "expected_status": " 204 ",
                     "expected_body": ""},
                    {"desc": "three", "method": "PUT", "url": "http://localhost/3", "body": "{\"a\": 1}",
                     "expected_status": "200", "expected_body": "{\"a\":1}"}
                ]
            }"#,
        )
        .unwrap();

        let cases = template.suite().unwrap();
        let descriptions: Vec<_> = cases.iter().map(|case| case.description.as_str()).collect();
        assert_eq!(descriptions, vec!["one", "two", "three"]);
        assert_eq!(cases[1].request.method, HttpMethod::Delete);
        assert_eq!(cases[1].expected_status, " 204 ");
        assert_eq!(cases[1].expected_body, None);
        assert_eq!(cases[2].expected_body.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn suite_ignores_top_level_request() {
        let template = parse(
            r#"{"testcases": [{"method": "GET", "url": "http://localhost/1", "expected_status": "200"}]}"#,
        )
        .unwrap();

        assert_eq!(template.suite().unwrap().len(), 1);
    }

    #[test]
    fn invalid_case_method_names_the_case() {
        let err = parse(
            r#"{"testcases": [
                {"method": "GET", "url": "http://localhost/1"},
                {"method": "BREW", "url": "http://localhost/2"}
            ]}"#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("test case #2"), "{message}");
        assert!(message.contains("method"), "{message}");
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = parse(r#"{"method": "GET", "url": "  "}"#).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidField { field: "url", .. }));
    }

    #[test]
    fn variables_are_interpolated() {
        let record: TemplateRecord = serde_json::from_str(
            r#"{"testcases": [{"method": "GET", "url": "{{base}}/users/{{id}}", "headers": "X-Id: {{id}}",
                "expected_status": "200", "expected_body": "{\"id\": {{id}}}"}]}"#,
        )
        .unwrap();
        let vars = Variables::from_assignments(["base=http://localhost:5000", "id=7"]).unwrap();

        let template = Template::from_record("users", record, &vars).unwrap();
        let case = &template.suite().unwrap()[0];
        assert_eq!(case.request.url, "http://localhost:5000/users/7");
        assert_eq!(case.request.headers, vec!["X-Id: 7"]);
        assert_eq!(case.expected_body.as_deref(), Some("{\"id\": 7}"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(&dir.path().join("absent.json"), &Variables::new()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::File::create(&path).unwrap().write_all(b"{ not json").unwrap();

        let err = load_template(&path, &Variables::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Malformed { .. }));
    }

    #[test]
    fn load_names_template_after_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smoke.json");
        fs::write(
            &path,
            r#"{"testcases": [{"desc": "ping", "method": "GET", "url": "http://localhost/ping", "expected_status": "200"}]}"#,
        )
        .unwrap();

        let template = load_template(&path, &Variables::new()).unwrap();
        assert_eq!(template.name, "smoke");
        assert_eq!(template.suite().unwrap()[0].description, "ping");
    }
}
