//! Todo CLI
//!
//! Command-line interface for the todo API server.
//!
//! # Usage
//!
//! ```bash
//! todoctl --help
//! todoctl health
//! todoctl add "Write report" --description "Q3 numbers"
//! todoctl complete 1
//! todoctl collector export
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

/// Todo CLI - command-line client for the todo API
#[derive(Parser)]
#[command(name = "todoctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "TODO_API_URL",
        default_value = "http://localhost:5000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// List all todos
    List,
    /// Create a todo
    Add {
        /// Todo title
        title: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Create the todo already completed
        #[arg(long)]
        completed: bool,
    },
    /// Mark a todo as completed
    Complete {
        /// Todo id
        id: u64,
    },
    /// Delete a todo
    Delete {
        /// Todo id
        id: u64,
    },
    /// Collector integration
    #[command(subcommand)]
    Collector(CollectorCommands),
}

#[derive(Subcommand)]
enum CollectorCommands {
    /// Show collector configuration status
    Status,
    /// Send a connection test event
    Test,
    /// Export the current metrics snapshot
    Export,
}

/// Thin JSON client for the todo API.
struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and returns the JSON body. Non-2xx answers are errors.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.url(path);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;
        let status = response.status();
        let text = response.text().await?;
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            bail!("{status}: {}", describe_error(&value));
        }
        Ok(value)
    }
}

fn describe_error(body: &Value) -> String {
    match (body.get("error"), body.get("message")) {
        (Some(error), Some(message)) => format!("{} ({})", as_text(error), as_text(message)),
        (Some(error), None) => as_text(error),
        (None, Some(message)) => as_text(message),
        (None, None) => as_text(body),
    }
}

fn as_text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

/// Maps a command to the request it issues.
fn request_for(command: &Commands) -> (Method, String, Option<Value>) {
    match command {
        Commands::Health => (Method::GET, "/health".to_string(), None),
        Commands::List => (Method::GET, "/api/todos".to_string(), None),
        Commands::Add {
            title,
            description,
            completed,
        } => (
            Method::POST,
            "/api/todos".to_string(),
            Some(json!({
                "title": title,
                "description": description.clone().unwrap_or_default(),
                "completed": completed,
            })),
        ),
        Commands::Complete { id } => (
            Method::PUT,
            format!("/api/todos/{id}"),
            Some(json!({"completed": true})),
        ),
        Commands::Delete { id } => (Method::DELETE, format!("/api/todos/{id}"), None),
        Commands::Collector(CollectorCommands::Status) => {
            (Method::GET, "/collector/status".to_string(), None)
        }
        Commands::Collector(CollectorCommands::Test) => {
            (Method::POST, "/collector/test".to_string(), None)
        }
        Commands::Collector(CollectorCommands::Export) => {
            (Method::POST, "/collector/export-metrics".to_string(), None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Todo CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for usage information");
        return Ok(());
    };

    let client = ApiClient::new(&cli.api_url);
    let (method, path, body) = request_for(&command);
    let response = client.send(method, &path, body).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
