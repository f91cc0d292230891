//! # Command Line
//!
//! `caseman run` executes a template's test cases headlessly for CI use;
//! `send` fires a single ad-hoc request; `headers`, `history` and `templates`
//! manage the data directory.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::auth::AuthMethod;
use crate::http::method::HttpMethod;

#[derive(Parser, Debug)]
#[command(name = "caseman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter written to stderr (e.g. `info`, `caseman=debug`)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Data directory holding settings, history and saved templates [default: ./.caseman]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every test case of a template and print the report
    Run(RunArgs),
    /// Send a single request
    Send(SendArgs),
    /// Manage default headers sent with every request
    Headers {
        #[command(subcommand)]
        action: HeadersAction,
    },
    /// Show recently executed requests
    History {
        /// Number of entries to show (newest first)
        #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
        limit: u64,
    },
    /// List saved templates
    Templates,
}

#[derive(Subcommand, Debug)]
pub enum HeadersAction {
    /// Print the default headers
    List,
    /// Add a `Name: Value` default header
    Add {
        #[arg(value_name = "LINE")]
        line: String,
    },
    /// Remove all default headers
    Clear,
}

/// Output format for suite reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options shared by every command that sends requests.
#[derive(Args, Debug, Clone, Default)]
pub struct ExecutionArgs {
    /// Replace `{{KEY}}` placeholders with VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Request timeout in seconds, overriding the saved setting
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not record executed requests in history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Template file path, or the name of a saved template
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also save the rendered report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// Target URL (required unless prefilled from a template)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// HTTP method: GET, POST, PUT, PATCH or DELETE
    #[arg(short = 'X', long)]
    pub method: Option<HttpMethod>,

    /// `Name: Value` header line (repeatable); replaces prefilled headers
    #[arg(short = 'H', long = "header", value_name = "LINE")]
    pub headers: Vec<String>,

    /// Request body; ignored for GET
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    pub body: Option<String>,

    /// Prefill from a saved template that has no test cases
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Raw `Name: Value` authentication header, sent last
    #[arg(long, value_name = "LINE", conflicts_with_all = ["bearer", "basic"])]
    pub auth_header: Option<String>,

    /// Bearer token for the Authorization header
    #[arg(long, value_name = "TOKEN", conflicts_with = "basic")]
    pub bearer: Option<String>,

    /// Basic auth credentials
    #[arg(long, value_name = "USER:PASS")]
    pub basic: Option<String>,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

impl SendArgs {
    pub fn auth(&self) -> AuthMethod {
        if let Some(line) = &self.auth_header {
            AuthMethod::Header(line.clone())
        } else if let Some(token) = &self.bearer {
            AuthMethod::BearerToken(token.clone())
        } else if let Some(pair) = &self.basic {
            AuthMethod::basic_from_pair(pair)
        } else {
            AuthMethod::None
        }
    }
}
