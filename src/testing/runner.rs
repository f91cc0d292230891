use serde::Serialize;
use tracing::{debug, info};

use crate::history::HistoryLog;
use crate::http::builder::build_request;
use crate::http::client::HttpExecutor;
use crate::http::response::ExecutionResult;
use crate::template::TestCase;

use super::{Verdict, evaluate};

/// One executed case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRecord {
    pub case: TestCase,
    pub result: ExecutionResult,
    pub verdict: Verdict,
}

/// Results of a full suite run, in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseRecord>,
}

impl SuiteReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, record: CaseRecord) {
        if record.verdict.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.total += 1;
        self.cases.push(record);
    }
}

/// Runs cases one after another through build, execute and evaluate.
pub struct SuiteRunner<'a> {
    executor: &'a HttpExecutor,
    default_headers: &'a [String],
    history: Option<&'a HistoryLog>,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(executor: &'a HttpExecutor, default_headers: &'a [String]) -> Self {
        Self {
            executor,
            default_headers,
            history: None,
        }
    }

    pub fn with_history(mut self, history: &'a HistoryLog) -> Self {
        self.history = Some(history);
        self
    }

    /// Every case runs; a failing case never stops the suite.
    pub async fn run(&self, name: &str, cases: &[TestCase]) -> SuiteReport {
        let mut report = SuiteReport::new(name);
        info!(suite = name, cases = cases.len(), "running suite");

        for (index, case) in cases.iter().enumerate() {
            let request = build_request(&case.request, self.default_headers);
            let result = self.executor.execute(&request).await;
            if let Some(history) = self.history {
                history.record(&request, &result);
            }

            let verdict = evaluate(case, &result);
            debug!(case = index + 1, status = ?verdict.status, body = ?verdict.body, "case evaluated");
            report.push(CaseRecord {
                case: case.clone(),
                result,
                verdict,
            });
        }

        info!(total = report.total, passed = report.passed, failed = report.failed, "suite finished");
        report
    }
}
