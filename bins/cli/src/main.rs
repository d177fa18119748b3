//! moneyconv - converts an amount between currencies at the ECB daily rate.
//!
//! # Usage
//!
//! ```bash
//! # Convert 34.98 US dollars into euros
//! moneyconv --from USD 34.98
//!
//! # Convert into another currency
//! moneyconv --from USD --to JPY 34.98
//!
//! # Drop every cached rate table, then convert with a fresh one
//! moneyconv --clear --from USD 34.98
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moneyconv_core::{Amount, Currency, Decimal, convert};
use moneyconv_ecb::EcbClient;
use moneyconv_shared::{AppConfig, AppError};

#[derive(Debug, Parser)]
#[command(name = "moneyconv")]
#[command(author, version, about = "Converts money using the ECB daily reference rates")]
struct Cli {
    /// Source currency, required to convert
    #[arg(long, value_name = "CODE")]
    from: Option<String>,

    /// Target currency
    #[arg(long, value_name = "CODE", default_value = "EUR")]
    to: String,

    /// Clears all cached rate tables
    #[arg(long)]
    clear: bool,

    /// Amount to convert, e.g. 34.98
    #[arg(allow_negative_numbers = true)]
    amount: Option<String>,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moneyconv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            error!(code, "{err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()
        .map_err(AppError::from)
        .context("unable to load configuration")?;
    let client = EcbClient::from_config(&config).map_err(AppError::from)?;

    if cli.clear {
        client
            .clear_cache()
            .map_err(AppError::from)
            .context("unable to clear cache files")?;

        if cli.from.is_none() && cli.amount.is_none() {
            return Ok(());
        }
    }

    let (Some(from), Some(value)) = (cli.from.as_deref(), cli.amount.as_deref()) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "both --from <CODE> and an amount to convert are required",
            )
            .exit();
    };

    let amount = parse_amount(from, value)?;
    let target = Currency::parse(&cli.to)
        .map_err(AppError::from)
        .with_context(|| format!("unable to parse target currency {:?}", cli.to))?;

    let converted = convert(&amount, &target, &client)
        .map_err(AppError::from)
        .with_context(|| format!("unable to convert {amount} to {target}"))?;

    println!("{amount} - {converted}");
    Ok(())
}

fn parse_amount(code: &str, value: &str) -> anyhow::Result<Amount> {
    let currency = Currency::parse(code)
        .map_err(AppError::from)
        .with_context(|| format!("unable to parse source currency {code:?}"))?;
    let quantity = Decimal::parse(value)
        .map_err(AppError::from)
        .with_context(|| format!("unable to parse value {value:?}"))?;

    Ok(Amount::new(quantity, currency).map_err(AppError::from)?)
}
