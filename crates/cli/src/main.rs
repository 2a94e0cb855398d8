mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use questgen_core::config::load_dotenv;
use questgen_core::{Config, GenerationParameters};
use serde::Serialize;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Before parsing, so .env can supply QUESTGEN_PROFILE.
    load_dotenv();
    let args = CliArgs::parse();

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();

    match args.command {
        Command::Analyze { file, min_words, topics } => {
            print_json(&commands::analyze(&config, &file, min_words, topics)?)
        }
        Command::Classify { text, context } => print_json(&commands::classify(&text, &context)),
        Command::Generate { file, provider, count, types, topics } => {
            let params = GenerationParameters {
                num_questions: count,
                question_types: types,
                topics_filter: (!topics.is_empty()).then_some(topics),
                ..GenerationParameters::default()
            };
            let outcome =
                commands::generate(config, &file, params, provider.as_deref()).await?;
            print_json(&outcome)
        }
        Command::Regenerate { file, r#type, difficulty, topic, provider } => {
            let question = commands::regenerate(
                config,
                &file,
                r#type,
                difficulty,
                topic.as_deref(),
                provider.as_deref(),
            )
            .await?;
            print_json(&question)
        }
        Command::Config => print_json(&config.redacted_summary()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
