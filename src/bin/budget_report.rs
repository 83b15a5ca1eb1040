use std::{error::Error, fs, path::PathBuf, process::exit, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally::{
    ApiClient, ClientConfig, DEFAULT_BASE_URL, format_currency,
    budget::{ExpenseCategory, PieChart, Session},
};

/// Summarise the month's budget from the transactions stored by a tally server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Who the budget is for.
    #[arg(long)]
    name: String,

    /// The budget for the month in dollars.
    #[arg(long)]
    budget: f64,

    /// Where the API is served from.
    #[arg(long, env = "TALLY_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// How long to wait for the API, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Change a category's share of the budget, e.g. `--allocate Food=30`.
    /// May be repeated. Changes that would take the total over 100% are skipped.
    #[arg(long, value_parser = parse_allocation)]
    allocate: Vec<(ExpenseCategory, u32)>,

    /// File path to write the allocation chart SVG to.
    #[arg(long, short, default_value = "budget.svg")]
    output_path: PathBuf,
}

fn parse_allocation(text: &str) -> Result<(ExpenseCategory, u32), String> {
    let (category, percentage) = text
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=PERCENT, got \"{text}\""))?;

    let category = category.parse().map_err(|error| format!("{error}"))?;
    let percentage = percentage
        .trim()
        .parse()
        .map_err(|error| format!("invalid percentage \"{percentage}\": {error}"))?;

    Ok((category, percentage))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut session = Session::new();
    let active = match session.setup(&args.name, args.budget) {
        Ok(active) => active,
        Err(error) => {
            eprintln!("Could not set up the budget: {error}");
            exit(1);
        }
    };

    let client = ApiClient::new(ClientConfig {
        base_url: args.base_url,
        timeout: Duration::from_secs(args.timeout),
    })?;

    let count = active.refresh(&client).await?;

    for (category, percentage) in args.allocate {
        if !active.set_allocation(category, percentage) {
            eprintln!(
                "Skipping {category}={percentage}%, at most {}% is available",
                active.allocation().max_for(category)
            );
        }
    }

    println!("Budget for {}", active.name());
    println!("Monthly budget: {}", format_currency(active.monthly_budget()));
    println!("Transactions: {count}");
    println!(
        "Balance: {} ({})",
        format_currency(active.balance()),
        active.balance_class().css_class()
    );

    println!();
    println!("Allocation ({}% assigned):", active.allocation().total());
    for entry in active.legend() {
        println!(
            "  {:<14} {:>3}%  {}",
            entry.category.name(),
            entry.percentage,
            format_currency(entry.allocated_amount)
        );
    }

    let svg = PieChart::default().render(&active.pie_slices()).into_string();
    fs::write(&args.output_path, svg)?;
    println!();
    println!("Wrote chart to {:#?}", args.output_path);

    Ok(())
}
