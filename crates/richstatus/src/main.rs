use std::{process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand, ValueEnum};
use richstatus_core::{
    CreateUserAltResponse, CreateUserRequest, DetailKind, KnownDetail, RenderOptions, StatusError,
};
use richstatus_service::{InMemoryUserRepository, UserService, UserServiceImpl};
use serde_json::{Value, json};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "richstatus", about = "Rich status error details demo")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Spaces before each detail line in text output.
    #[arg(long, default_value_t = 2)]
    indent: usize,
    /// Print each text summary on one line.
    #[arg(long)]
    single_line: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creates users in order against a fresh in-memory store.
    Create {
        #[arg(long = "user", value_name = "USERNAME=EMAIL", required = true)]
        users: Vec<String>,
        /// Report failures in the response body instead of as a status.
        #[arg(long)]
        alt: bool,
        #[arg(long = "lookup-email", value_name = "EMAIL")]
        lookup_emails: Vec<String>,
        #[arg(long = "lookup-username", value_name = "USERNAME")]
        lookup_usernames: Vec<String>,
    },
    /// Lists the well-known detail kinds and their type URLs.
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid user '{value}': expected USERNAME=EMAIL")]
    InvalidUser { value: String },
    #[error("failed to render json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{failed} of {total} operations failed")]
    Rejected { failed: usize, total: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let printer = Printer {
        format: cli.format,
        options: RenderOptions {
            indent: cli.indent,
            multiline: !cli.single_line,
        },
    };

    match cli.command {
        Command::Create {
            users,
            alt,
            lookup_emails,
            lookup_usernames,
        } => {
            let requests = parse_user_pairs(users)?;
            let service = UserServiceImpl::new(Arc::new(InMemoryUserRepository::new()));
            let total = requests.len() + lookup_emails.len() + lookup_usernames.len();
            let mut failed = 0_usize;

            for request in requests {
                let ok = if alt {
                    let response = service.create_user_alt(request).await;
                    printer.alt(&response)?
                } else {
                    let outcome = service.create_user(request).await;
                    printer.outcome(outcome.map(|created| {
                        json!({ "user_id": created.user_id, "status": created.status })
                    }))?
                };
                failed += usize::from(!ok);
            }

            for email in lookup_emails {
                let outcome = service.get_user_by_email(&email).await;
                failed += usize::from(!printer.outcome(outcome.map(|user| json!(user)))?);
            }

            for username in lookup_usernames {
                let outcome = service.get_user_by_username(&username).await;
                failed += usize::from(!printer.outcome(outcome.map(|user| json!(user)))?);
            }

            if failed > 0 {
                return Err(CliError::Rejected { failed, total });
            }
            Ok(())
        }
        Command::Catalog => {
            for kind in DetailKind::ALL {
                println!("{:<20} {}", kind.name(), kind.type_url());
            }
            Ok(())
        }
    }
}

/// Output settings chosen on the command line.
struct Printer {
    format: Format,
    options: RenderOptions,
}

impl Printer {
    /// Prints one out-of-band outcome and reports whether it succeeded.
    fn outcome(&self, outcome: Result<Value, StatusError>) -> Result<bool, CliError> {
        match (self.format, outcome) {
            (Format::Text, Ok(value)) => {
                println!("response: {value}");
                Ok(true)
            }
            (Format::Text, Err(err)) => {
                println!("{}", err.render(&self.options));
                Ok(false)
            }
            (Format::Json, Ok(value)) => {
                println!("{}", serde_json::to_string_pretty(&json!({ "response": value }))?);
                Ok(true)
            }
            (Format::Json, Err(err)) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "error": status_json(&err)? }))?
                );
                Ok(false)
            }
        }
    }

    fn alt(&self, response: &CreateUserAltResponse) -> Result<bool, CliError> {
        match self.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(response)?),
            Format::Text => match response.result.error_value() {
                Some(error) => println!("error [{}]: {}", error.code, error.message),
                None => println!("response: {}", serde_json::to_value(&response.result)?),
            },
        }
        Ok(response.result.is_success())
    }
}

/// JSON view of a status with known details decoded, in the style of `@type`-tagged Any.
fn status_json(err: &StatusError) -> Result<Value, CliError> {
    let mut details: Vec<Value> = err
        .details()
        .known()
        .iter()
        .map(detail_json)
        .collect::<Result<_, _>>()?;

    details.extend(err.details().unknown().iter().map(|entry| {
        json!({
            "@type": entry.type_url,
            "bytes": entry.value.len(),
        })
    }));

    Ok(json!({
        "code": err.code().as_i32(),
        "status": err.code(),
        "message": err.message(),
        "details": details,
    }))
}

fn detail_json(detail: &KnownDetail) -> Result<Value, CliError> {
    let mut value = match detail {
        KnownDetail::ErrorInfo(v) => serde_json::to_value(v),
        KnownDetail::BadRequest(v) => serde_json::to_value(v),
        KnownDetail::PreconditionFailure(v) => serde_json::to_value(v),
        KnownDetail::QuotaFailure(v) => serde_json::to_value(v),
        KnownDetail::RetryInfo(v) => serde_json::to_value(v),
        KnownDetail::ResourceInfo(v) => serde_json::to_value(v),
        KnownDetail::RequestInfo(v) => serde_json::to_value(v),
        KnownDetail::DebugInfo(v) => serde_json::to_value(v),
        KnownDetail::Help(v) => serde_json::to_value(v),
        KnownDetail::LocalizedMessage(v) => serde_json::to_value(v),
    }?;

    if let Value::Object(fields) = &mut value {
        fields.insert(
            "@type".to_string(),
            Value::String(detail.kind().type_url().to_string()),
        );
    }
    Ok(value)
}

fn parse_user_pairs(pairs: Vec<String>) -> Result<Vec<CreateUserRequest>, CliError> {
    pairs
        .into_iter()
        .map(|pair| {
            let Some((username, email)) = pair.split_once('=') else {
                return Err(CliError::InvalidUser { value: pair });
            };

            Ok(CreateUserRequest {
                username: username.to_string(),
                email: email.to_string(),
            })
        })
        .collect()
}
