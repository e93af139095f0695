//! # tse-runner
//!
//! Command-line entry point for the TSE option data system.
//!
//! Loads an optional JSON configuration file, initializes logging and runs
//! one of the data commands. Results are written through the log.
//!
//! # Usage
//!
//! ```bash
//! tse-runner screen --top 5
//! tse-runner chains --ua 17914401175772326 --option-type put --by strike
//! tse-runner stream --polls 3 --market all_market
//! tse-runner lob --code 17091434834979599 --date 1403-10-24 --at 10:50
//! tse-runner quotes IRO9AHRM6981 IRO9IKCO81M1 --detail
//! tse-runner --config config.json screen
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tse_core::OptionFilter;
use tse_core::config::{AppConfig, load_config};
use tse_core::logging::{LogSettings, init_logging};
use tse_md::ReqwestTransport;
use tse_md::mercantile::{self, MarketName, MercantileData};
use tse_md::tadbir::TadbirClient;
use tse_md::tsetmc::{HistoricalLobRequest, TsetmcClient, take_lob_snapshot};
use tse_screen::{OptionChains, OptionMarket, format_billion_toman};

/// TSE Option Data Runner.
#[derive(Parser)]
#[command(name = "tse-runner", about = "TSE option market data & screens")]
struct Cli {
    /// Configuration file path (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides the config.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Optional log directory for file output. Overrides the config.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the option market snapshot and print the market screens.
    Screen {
        #[arg(short = 'n', long, default_value_t = 5)]
        top: usize,
    },
    /// Print option chains for one underlying (or list underlyings).
    Chains {
        /// Underlying TSE code. Lists the underlyings when omitted.
        #[arg(long)]
        ua: Option<String>,
        #[arg(long, default_value = "both")]
        option_type: OptionFilter,
        #[arg(long, value_enum, default_value_t = ChainAxis::Date)]
        by: ChainAxis,
    },
    /// Open a mercantile hub session and poll it.
    Stream {
        #[arg(long, default_value_t = 1)]
        polls: usize,
        /// Market to extract from each batch (tag or alias).
        #[arg(long)]
        market: Option<MarketName>,
    },
    /// Historical order-book snapshot for one instrument.
    Lob {
        #[arg(long)]
        code: String,
        /// Jalali date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Snapshot time, `HH:MM`.
        #[arg(long, default_value = "12:30")]
        at: String,
    },
    /// Tadbir bulk quotes, optionally with per-symbol detail.
    Quotes {
        #[arg(required = true)]
        codes: Vec<String>,
        #[arg(long)]
        detail: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChainAxis {
    Date,
    Strike,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };

    // 2. Initialize logging
    let log = LogSettings::from_config(&config.logging)
        .with_level(cli.log_level.as_deref())
        .with_dir(cli.log_dir.as_deref());
    init_logging(&log);
    info!("tse-runner starting: log_level={}, log_dir={:?}", log.level, log.dir);

    // 3. Run the command
    let transport = ReqwestTransport::new();
    match cli.command {
        Command::Screen { top } => run_screen(&config, transport, top).await,
        Command::Chains { ua, option_type, by } => run_chains(&config, transport, ua, option_type, by).await,
        Command::Stream { polls, market } => run_stream(&config, transport, polls, market).await,
        Command::Lob { code, date, at } => run_lob(&config, transport, &code, &date, &at).await,
        Command::Quotes { codes, detail } => run_quotes(&config, transport, &codes, detail).await,
    }
}

async fn run_screen(config: &AppConfig, transport: ReqwestTransport, top: usize) -> Result<()> {
    let client = TsetmcClient::new(transport, config.tsetmc.clone());
    let market = OptionMarket::new(client.options_snapshot().await.context("option snapshot")?);
    info!("{} contract(s), total trade value {}", market.contracts().len(), format_billion_toman(market.total_trade_value()));

    let extremes = market.extreme_open_position_changes(top);
    for c in &extremes.best {
        info!("open positions up    {:>12} {:+}", c.ticker, c.delta);
    }
    for c in &extremes.worst {
        info!("open positions down  {:>12} {:+}", c.ticker, c.delta);
    }

    let most = market.most_traded(top);
    for (side, entries) in [("call", &most.call), ("put", &most.put)] {
        for e in entries {
            info!("most traded {side:<4} {:>12} {}", e.ticker, format_billion_toman(e.trades_value));
        }
    }

    for row in market.most_traded_by_underlying(top) {
        info!(
            "underlying {:>10} call={} put={} total={}",
            row.ua_ticker,
            format_billion_toman(row.call),
            format_billion_toman(row.put),
            format_billion_toman(row.total)
        );
    }
    Ok(())
}

async fn run_chains(
    config: &AppConfig,
    transport: ReqwestTransport,
    ua: Option<String>,
    filter: OptionFilter,
    by: ChainAxis,
) -> Result<()> {
    let client = TsetmcClient::new(transport, config.tsetmc.clone());
    let chains = OptionChains::new(client.options_snapshot().await.context("option snapshot")?);

    let Some(ua) = ua else {
        for u in chains.underlying_asset_info() {
            info!("{:>20} {:>12} {}", u.ua_tse_code, u.ua_ticker, format_billion_toman(u.trades_value));
        }
        return Ok(());
    };

    match by {
        ChainAxis::Date => {
            for chain in chains.date_chains(&ua, filter)? {
                let strikes: Vec<f64> = chain.options.iter().map(|c| c.strike_price).collect();
                info!("expiry {}: {} option(s), strikes {strikes:?}", chain.end_date, chain.options.len());
            }
        }
        ChainAxis::Strike => {
            for chain in chains.strike_chains(&ua, filter)? {
                let expiries: Vec<&str> = chain.options.iter().map(|c| c.end_date.as_str()).collect();
                info!("strike {}: {} option(s), expiries {expiries:?}", chain.strike_price, chain.options.len());
            }
        }
    }
    Ok(())
}

async fn run_stream(
    config: &AppConfig,
    transport: ReqwestTransport,
    polls: usize,
    market: Option<MarketName>,
) -> Result<()> {
    let mut stream = mercantile::connect_stream(transport, config.mercantile.base_url.as_str());
    let mut data = MercantileData::new();
    let timeout = config.mercantile.poll_timeout();

    for i in 0..polls {
        tokio::select! {
            res = stream.refresh(&mut data, timeout) => res.with_context(|| format!("poll {i}"))?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
        }

        let tags: Vec<&str> = data.batch().iter().map(|r| r.market.as_str()).collect();
        info!("poll {i}: {} record(s) {tags:?}", tags.len());

        if let Some(name) = market {
            match data.extract(name) {
                Ok(payload) => {
                    let rows = payload.as_array().map_or(1, Vec::len);
                    info!("{name}: {rows} row(s)");
                }
                Err(e) => warn!("{name}: {e}"),
            }
        }
    }
    Ok(())
}

async fn run_lob(config: &AppConfig, transport: ReqwestTransport, code: &str, date: &str, at: &str) -> Result<()> {
    let request = HistoricalLobRequest::new(code, date)?;
    let client = TsetmcClient::new(transport, config.tsetmc.clone());
    let levels = client.fetch_historical_lob(&request).await.context("historical order book")?;
    info!("{} update(s) on {}", levels.len(), request.date());

    for l in take_lob_snapshot(&levels, at)? {
        info!(
            "L{} {} | bid {} x {} ({}) | ask {} x {} ({})",
            l.level, l.time, l.bid_price, l.bid_volume, l.bid_number, l.ask_price, l.ask_volume, l.ask_number
        );
    }
    Ok(())
}

async fn run_quotes(config: &AppConfig, transport: ReqwestTransport, codes: &[String], detail: bool) -> Result<()> {
    let client = TadbirClient::new(transport, config.tadbir.clone());
    let frame = client.bulk_quotes(codes).await.context("bulk quotes")?;
    for record in frame.records() {
        info!("{}", serde_json::Value::Object(record));
    }

    if detail {
        for code in codes {
            let d = client.symbol_detail(code).await.with_context(|| format!("detail {code}"))?;
            info!(
                "{code}: {} info field(s), last price {}",
                d.symbol_info.len(),
                d.info("LastTradedPrice").unwrap_or(&serde_json::Value::Null)
            );
            for level in &d.order_book {
                info!(
                    "  #{} bid {} x {} | ask {} x {}",
                    level.place, level.best_buy_price, level.best_buy_quantity, level.best_sell_price, level.best_sell_quantity
                );
            }
        }
    }
    Ok(())
}
