use anyhow::Context;
use clap::Parser;
use crypto_commander::api::{OkxClient, UsdtRateClient};
use crypto_commander::history::{LogEntry, SignalLog};
use crypto_commander::pnl::{estimate_round_trip, validate_positive, TradePlan};
use crypto_commander::report::{render_estimate, render_recommendation};
use crypto_commander::{Commander, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

/// RSI-based trade recommendations for OKX spot pairs
#[derive(Debug, Parser)]
#[command(name = "crypto-commander", version, about)]
struct Cli {
    /// Coin symbol (ETH) or instrument id (ETH-USDC)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Capital in VND for the profit estimate
    #[arg(long)]
    capital: Option<f64>,

    /// USDT/VND rate for the profit estimate
    #[arg(long, conflicts_with = "fetch_rate")]
    rate: Option<f64>,

    /// Fetch the USDT/VND rate from CoinGecko
    #[arg(long)]
    fetch_rate: bool,

    /// Buy price for the profit estimate (defaults to the suggested entry)
    #[arg(long)]
    buy_price: Option<f64>,

    /// Sell price for the profit estimate (defaults to the suggested take profit)
    #[arg(long)]
    sell_price: Option<f64>,

    /// Re-run every refresh interval until Ctrl+C
    #[arg(short, long)]
    watch: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (defaults to ./commander.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load().context("Failed to load settings")?,
    };

    validate_inputs(&cli, &settings)?;

    let symbol = cli
        .symbol
        .clone()
        .unwrap_or_else(|| settings.default_symbol.clone());
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let usdt_rate = match cli.rate {
        Some(rate) => rate,
        None if cli.fetch_rate => {
            UsdtRateClient::with_base_url(&settings.coingecko_base_url, timeout)
                .context("Failed to build CoinGecko client")?
                .get_usdt_vnd_rate_or_default()
                .await
        }
        None => settings.usdt_rate,
    };

    let okx = OkxClient::with_base_url(&settings.okx_base_url, timeout)
        .context("Failed to build OKX client")?;
    let commander = Commander::new(okx, &settings);
    let mut log = SignalLog::new(settings.log_capacity);

    tracing::info!("🚀 Crypto Commander starting for {}", symbol);

    if !cli.watch {
        let (entry, _) = commander
            .run_once(&symbol, log)
            .await
            .with_context(|| format!("Analysis failed for {}", symbol))?;
        print_entry(&cli, &settings, usdt_rate, &entry)?;
        return Ok(());
    }

    let mut ticker = interval(Duration::from_secs(settings.refresh_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "🔄 Refreshing every {}s, press Ctrl+C to stop",
        settings.refresh_interval_secs
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("⚠️  Received Ctrl+C, shutting down...");
                break;
            }
            _ = ticker.tick() => {
                // The log is moved into each run; keep a copy in case it fails
                match commander.run_once(&symbol, log.clone()).await {
                    Ok((entry, updated)) => {
                        log = updated;
                        if let Err(e) = print_entry(&cli, &settings, usdt_rate, &entry) {
                            tracing::error!("Failed to print analysis for {}: {}", symbol, e);
                        }
                        tracing::info!(
                            "📜 {} analyses logged ({} actionable)",
                            log.len(),
                            log.actionable().count()
                        );
                    }
                    Err(e) => tracing::error!("Analysis failed for {}: {}", symbol, e),
                }
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    }

    tracing::info!("👋 Crypto Commander stopped");
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crypto_commander=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Fail fast on amounts that can never produce an estimate
fn validate_inputs(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let flags = [
        ("--capital", cli.capital),
        ("--rate", cli.rate),
        ("--buy-price", cli.buy_price),
        ("--sell-price", cli.sell_price),
    ];
    for (flag, value) in flags {
        if let Some(value) = value {
            validate_positive(flag, value).context("Invalid command-line input")?;
        }
    }

    validate_positive("capital_vnd", settings.capital_vnd).context("Invalid settings")?;
    validate_positive("usdt_rate", settings.usdt_rate).context("Invalid settings")?;
    Ok(())
}

fn print_entry(
    cli: &Cli,
    settings: &Settings,
    usdt_rate: f64,
    entry: &LogEntry,
) -> anyhow::Result<()> {
    let plan = TradePlan {
        capital_vnd: cli.capital.unwrap_or(settings.capital_vnd),
        usdt_rate,
        buy_price: cli.buy_price.unwrap_or(entry.recommendation.entry_price),
        sell_price: cli
            .sell_price
            .unwrap_or(entry.recommendation.take_profit_price),
    };

    // A zero last price from the exchange gives a zero entry; report it and move on
    let estimate = estimate_round_trip(&plan);
    if let Err(e) = &estimate {
        tracing::warn!("Skipping profit estimate for {}: {}", entry.symbol, e);
    }

    if cli.json {
        let output = serde_json::json!({
            "analysis": entry,
            "plan": plan,
            "estimate": estimate.as_ref().ok(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render_recommendation(entry));
        println!("{}", render_estimate(&estimate));
    }

    Ok(())
}
