use std::{process::ExitCode, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use tracing::{debug, info};
use walkcheck_core::{
    Config, PresentationSink, ProviderId, QueryContext, QueryOutcome, WeatherProvider,
    config::API_KEY_ENV,
    provider::provider_from_config,
    sink::{ErrorBanner, ErrorNotice},
};

use crate::render::{InteractiveSink, JsonSink, TerminalSink, WriteStatus};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "walkcheck", version, about = "Weather, walking advice and a packing checklist")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Show weather, advice and checklist for a city.
    Show {
        /// City name, e.g. "London" or "Paris, FR".
        city: String,

        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search repeatedly from a prompt; `:check N` ticks item N, `:quit` exits.
    Interactive {
        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,
    },
}

/// A line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum PromptInput {
    Quit,
    /// 1-based checklist position as typed.
    Check(usize),
    BadCheck,
    Search(String),
}

fn parse_prompt(line: &str) -> PromptInput {
    let trimmed = line.trim();
    match trimmed.strip_prefix(':') {
        Some("quit" | "q") => PromptInput::Quit,
        Some(rest) => match rest.strip_prefix("check").map(str::trim) {
            Some(n) => n.parse().map(PromptInput::Check).unwrap_or(PromptInput::BadCheck),
            None => PromptInput::Search(line.to_string()),
        },
        None => PromptInput::Search(line.to_string()),
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { provider } => {
                configure(&provider)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, provider, json } => {
                let provider = resolve_provider(provider.as_deref())?;
                if json {
                    show(provider.as_ref(), JsonSink::stdio(), &city).await
                } else {
                    show(provider.as_ref(), TerminalSink::stdio(), &city).await
                }
            }
            Command::Interactive { provider } => {
                let provider = resolve_provider(provider.as_deref())?;
                interactive(provider.as_ref()).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn show<S: PresentationSink + WriteStatus>(
    provider: &dyn WeatherProvider,
    mut sink: S,
    city: &str,
) -> anyhow::Result<ExitCode> {
    let outcome = QueryContext::new().search(provider, &mut sink, city).await;

    if let Some(err) = sink.take_io_error() {
        return Err(err).context("Failed to write output");
    }
    Ok(match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

/// Pick the provider from the flag or config, with the key from the
/// environment taking precedence over the stored one.
fn resolve_provider(flag: Option<&str>) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let mut config = Config::load()?;

    let id = match flag {
        Some(name) => ProviderId::try_from(name)?,
        None if config.default_provider.is_none() && std::env::var_os(API_KEY_ENV).is_some() => {
            ProviderId::OpenWeather
        }
        None => config.default_provider_id()?,
    };

    config.apply_env_api_key(id);
    debug!(provider = %id, timeout_secs = config.timeout_secs, "provider selected");
    provider_from_config(id, &config)
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    let already_default = config.default_provider_id().ok() == Some(id);
    if !already_default
        && Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read confirmation")?
    {
        config.set_default_provider(id);
    }

    let path = config.save()?;
    info!(provider = %id, path = %path.display(), "configuration saved");
    println!("Saved {id} configuration to {}", path.display());
    Ok(())
}

/// Prompt loop. The latest error is shown once, as the prompt's help line,
/// until it expires or a newer one replaces it.
async fn interactive(provider: &dyn WeatherProvider) -> anyhow::Result<()> {
    let mut ctx = QueryContext::new();
    let mut terminal = TerminalSink::stdio();
    let mut banner = ErrorBanner::default();

    loop {
        let help = banner.visible(Instant::now()).map(|notice| notice.message.clone());
        let mut prompt = Text::new("City:");
        if let Some(help) = help.as_deref() {
            prompt = prompt.with_help_message(help);
        }

        let line = match prompt.prompt() {
            Ok(line) => line,
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match parse_prompt(&line) {
            PromptInput::Quit => break,
            PromptInput::Check(n) => {
                let toggled = ctx
                    .current_report_mut()
                    .and_then(|report| n.checked_sub(1).and_then(|i| report.checklist.toggle(i)));
                match (toggled, ctx.current_report()) {
                    (Some(_), Some(report)) => {
                        banner.clear();
                        terminal.print_checklist(&report.checklist);
                    }
                    _ => post(&mut banner, format!("No checklist item {n}")),
                }
            }
            PromptInput::BadCheck => post(&mut banner, "Usage: :check <item number>".to_string()),
            PromptInput::Search(input) => {
                let mut sink = InteractiveSink::new(&mut terminal, &mut banner);
                match ctx.search(provider, &mut sink, &input).await {
                    Ok(QueryOutcome::Rendered(_) | QueryOutcome::Stale) => {}
                    Err(err) => debug!(error = %err, "search failed"),
                }
            }
        }

        if let Some(err) = terminal.take_io_error() {
            return Err(err).context("Failed to write output");
        }
    }

    Ok(())
}

fn post(banner: &mut ErrorBanner, message: String) {
    banner.post(ErrorNotice::new(message), Instant::now());
}
