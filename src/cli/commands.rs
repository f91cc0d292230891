use std::io;

use anyhow::{Context, Result, anyhow, bail};
use tracing::info;

use crate::environment::Variables;
use crate::history::HistoryLog;
use crate::http::builder::{build_request, validate_header_line};
use crate::http::client::HttpExecutor;
use crate::http::request::RequestSpec;
use crate::settings::Settings;
use crate::storage::{self, DataDir};
use crate::template::{TemplateMode, load_template};
use crate::testing::report::{render_json, render_text, write_report};
use crate::testing::runner::SuiteRunner;

use super::{ExecutionArgs, HeadersAction, OutputFormat, RunArgs, SendArgs};

/// Settings after command-line overrides, plus everything needed to send.
struct Session {
    settings: Settings,
    executor: HttpExecutor,
    history: Option<HistoryLog>,
    variables: Variables,
}

impl Session {
    fn open(data: &DataDir, args: &ExecutionArgs) -> Result<Self> {
        let mut settings = data.load_settings()?;
        if let Some(secs) = args.timeout {
            settings.timeout_secs = secs;
        }
        if args.no_history {
            settings.history_enabled = false;
        }

        let variables = Variables::from_assignments(&args.vars)?;
        let executor = HttpExecutor::new(settings.timeout()).map_err(|e| anyhow!(e))?;
        let history = settings.history_enabled.then(|| data.history_log());

        Ok(Self {
            settings,
            executor,
            history,
            variables,
        })
    }
}

pub async fn run(data: &DataDir, args: RunArgs) -> Result<()> {
    let session = Session::open(data, &args.execution)?;
    let path = data.resolve_template(&args.template)?;
    let template = load_template(&path, &session.variables)?;
    let cases = template.suite()?;

    let mut runner = SuiteRunner::new(&session.executor, &session.settings.default_headers);
    if let Some(history) = &session.history {
        runner = runner.with_history(history);
    }
    let report = runner.run(&template.name, cases).await;

    let rendered = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => render_json(&report)?,
    };
    write_report(io::stdout().lock(), &rendered).context("Failed to write report to stdout")?;

    if let Some(output) = &args.output {
        storage::save_report(output, &rendered)?;
        info!(path = %output.display(), "report saved");
    }
    Ok(())
}

pub async fn send(data: &DataDir, args: SendArgs) -> Result<()> {
    let session = Session::open(data, &args.execution)?;
    let spec = prefill(data, &args, &session.variables)?;

    let request = build_request(&spec, &session.settings.default_headers);
    let result = session.executor.execute(&request).await;
    if let Some(history) = &session.history {
        history.record(&request, &result);
    }

    if let Some(error) = result.transport_error {
        bail!(error);
    }
    println!(
        "{} ({} ms, {} bytes)",
        result.status_label(),
        result.elapsed_ms,
        result.size_bytes
    );
    if !result.body.is_empty() {
        println!("{}", result.body);
    }
    Ok(())
}

/// Start from the template's request when one is given, then apply the
/// explicit flags on top. Fails before any network call on bad input.
fn prefill(data: &DataDir, args: &SendArgs, variables: &Variables) -> Result<RequestSpec> {
    let mut spec = match &args.template {
        Some(reference) => {
            let path = data.resolve_template(reference)?;
            let template = load_template(&path, variables)?;
            match template.mode {
                TemplateMode::Prefill(request) => request,
                TemplateMode::Suite(_) => bail!(
                    "Template `{}` holds test cases; run it with `caseman run {reference}`",
                    template.name
                ),
            }
        }
        None => RequestSpec::default(),
    };

    if let Some(method) = args.method {
        spec.method = method;
    }
    if let Some(url) = &args.url {
        spec.url = variables.interpolate(url);
    }
    if !args.headers.is_empty() {
        for line in &args.headers {
            validate_header_line(line)?;
        }
        spec.headers = args.headers.iter().map(|line| variables.interpolate(line)).collect();
    }
    if let Some(body) = &args.body {
        spec.body = variables.interpolate(body);
    }
    spec.auth_header = args.auth().header_line()?;

    if spec.url.trim().is_empty() {
        bail!("A URL is required");
    }
    Ok(spec)
}

pub fn headers(data: &DataDir, action: HeadersAction) -> Result<()> {
    let mut settings = data.load_settings()?;
    match action {
        HeadersAction::List => {
            if settings.default_headers.is_empty() {
                println!("No default headers");
            }
            for line in &settings.default_headers {
                println!("{line}");
            }
        }
        HeadersAction::Add { line } => {
            validate_header_line(&line)?;
            if settings.add_default_header(&line) {
                data.save_settings(&settings)?;
                println!("Added default header `{}`", line.trim());
            } else {
                println!("Default header `{}` already present", line.trim());
            }
        }
        HeadersAction::Clear => {
            settings.clear_default_headers();
            data.save_settings(&settings)?;
            println!("Cleared default headers");
        }
    }
    Ok(())
}

pub fn history(data: &DataDir, limit: u64) -> Result<()> {
    let log = data.history_log();
    let history = log.recent(usize::try_from(limit).unwrap_or(usize::MAX))?;
    if history.entries().is_empty() {
        println!("No history yet in {}", log.path().display());
    }
    for entry in history.entries() {
        let status = entry
            .status
            .map(|code| code.to_string())
            .unwrap_or_else(|| "ERR".to_string());
        println!(
            "{}  {:<6} {:>3}  {:>6} ms  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.method.to_string(),
            status,
            entry.duration_ms,
            entry.url
        );
    }
    Ok(())
}

pub fn templates(data: &DataDir) -> Result<()> {
    let names = data.list_templates()?;
    if names.is_empty() {
        println!("No saved templates in {}", data.templates_dir().display());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
