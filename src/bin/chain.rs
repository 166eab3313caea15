//! Options Chain CLI
//!
//! Loads option rows from a JSON query result and prints the paired,
//! ranked chain for a symbol. With `--ticks` the demo price ticker drives
//! the reference price and the chain is reprinted on every step.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use options_chain::prelude::*;

/// Options chain table from a JSON row file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Query result file (wrapper object or bare array of rows)
    #[arg(short, long)]
    data: PathBuf,

    /// Underlying symbol; lists the available symbols when omitted
    #[arg(short, long)]
    symbol: Option<String>,

    /// Trade date filter (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Reference price for in-the-money ranking
    #[arg(short, long)]
    price: Option<f64>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on unpaired rows, duplicate legs and bad strikes
    #[arg(long, default_value = "false")]
    strict: bool,

    /// Pair rows positionally (call, put, call, put, ...)
    #[arg(long, default_value = "false")]
    positional: bool,

    /// Run the demo price ticker for this many steps
    #[arg(long)]
    ticks: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> ChainResult<()> {
    let mut config = match &args.config {
        Some(path) => ChainConfig::from_json_file(path)?,
        None => ChainConfig::default(),
    };
    if args.strict {
        config.unmatched = UnmatchedPolicy::Reject;
    }
    if args.positional {
        config.pairing = PairingMode::Positional;
    }

    let data = load_chain_data(&args.data)?;
    let mut table = OptionsChainTable::with_config(data, config);

    let Some(symbol) = args.symbol.as_deref() else {
        println!("Symbols:");
        for symbol in table.symbols() {
            println!("  {}", symbol);
        }
        return Ok(());
    };

    table.select_symbol(Some(symbol));
    table.select_date(args.date);
    table.set_reference_price(args.price);

    let dates: Vec<String> = table.dates().iter().map(|d| d.to_string()).collect();
    println!("{} trade dates: {}", symbol, dates.join(", "));

    match args.ticks {
        None => print_view(&table),
        Some(ticks) => run_ticker(&mut table, ticks),
    }
}

fn run_ticker(table: &mut OptionsChainTable, ticks: usize) -> ChainResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let handle = PriceTicker::spawn(&table.config().ticker)?;
        let mut rx = handle.subscribe();

        table.sync_reference_price(&mut rx);
        print_view(table)?;

        for _ in 0..ticks {
            if rx.changed().await.is_err() {
                break;
            }
            table.sync_reference_price(&mut rx);
            print_view(table)?;
        }

        handle.shutdown().await;
        Ok::<(), ChainError>(())
    })
}

fn print_view(table: &OptionsChainTable) -> ChainResult<()> {
    let view = table.view()?;
    let symbol = view.selection.symbol.as_deref().unwrap_or("");

    match view.selection.reference_price {
        Some(price) => println!("\n{} Stock Price: {:.2}", symbol, price),
        None => println!("\n{} Stock Price: N/A", symbol),
    }
    println!(
        "  {:<10} | {:>7} {:>7} {:>7} {:>7} | {:>8} | {:>7} {:>7} {:>7} {:>7} |",
        "Expiry", "Bid", "Ask", "Vol", "Delta", "Strike", "Bid", "Ask", "Vol", "Delta"
    );

    for pair in &view.pairs {
        // C: call in the money, P: put in the money
        let marker = if pair.call_in_the_money {
            'C'
        } else if pair.put_in_the_money {
            'P'
        } else {
            ' '
        };
        println!(
            "{} {:<10} | {:>7} {:>7} {:>7} {:>7} | {:>8} | {:>7} {:>7} {:>7} {:>7} | [{}] [{}]",
            marker,
            pair.call.expiration.to_string(),
            pair.call.bid,
            pair.call.ask,
            pair.call.volume,
            pair.call.delta,
            pair.call.strike,
            pair.put.bid,
            pair.put.ask,
            pair.put.volume,
            pair.put.delta,
            table.call_label(),
            table.put_label(),
        );
    }

    if !view.diagnostics.is_empty() {
        println!("({} rows dropped, see log)", view.diagnostics.len());
    }
    Ok(())
}
