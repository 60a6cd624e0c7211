//! ScalpLab CLI — run and sweep commands.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML config and a bar CSV
//! - `sweep` — run several configs over the same bars and rank them

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use scalplab_runner::{
    load_bars_csv, run_single_backtest, run_sweep, write_report_json, write_trades_csv,
    BacktestReport, RunConfig,
};

#[derive(Parser)]
#[command(
    name = "scalplab",
    about = "ScalpLab CLI — intraday strategy backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one backtest from a TOML config file and a bar CSV.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Path to the bar CSV (timestamp,open,high,low,close,volume).
        #[arg(long)]
        bars: PathBuf,

        /// Output directory for the JSON report.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write the trade list as CSV next to the report.
        #[arg(long, default_value_t = false)]
        trades: bool,
    },
    /// Run several configs over the same bars and rank them by net profit.
    Sweep {
        /// Paths to TOML run configs (two or more).
        #[arg(long, required = true, num_args = 1..)]
        configs: Vec<PathBuf>,

        /// Path to the bar CSV shared by every run.
        #[arg(long)]
        bars: PathBuf,

        /// Output directory for the per-run JSON reports.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            bars,
            output_dir,
            trades,
        } => run_cmd(&config, &bars, &output_dir, trades),
        Commands::Sweep {
            configs,
            bars,
            output_dir,
        } => sweep_cmd(&configs, &bars, &output_dir),
    }
}

fn run_cmd(config_path: &Path, bars_path: &Path, output_dir: &Path, trades: bool) -> Result<()> {
    let config = RunConfig::from_toml_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let bars = load_bars_csv(bars_path)
        .with_context(|| format!("loading bars {}", bars_path.display()))?;
    let bars = filter_range(bars, &config);

    let report = run_single_backtest(&config, &bars)?;
    print_summary(&report);

    std::fs::create_dir_all(output_dir)?;
    let report_path = output_dir.join(format!("{}.json", report.run_id));
    write_report_json(&report, &report_path)?;
    println!("Report saved to: {}", report_path.display());

    if trades {
        let trades_path = output_dir.join(format!("{}_trades.csv", report.run_id));
        write_trades_csv(&report, &trades_path)?;
        println!("Trades saved to: {}", trades_path.display());
    }

    Ok(())
}

fn sweep_cmd(config_paths: &[PathBuf], bars_path: &Path, output_dir: &Path) -> Result<()> {
    if config_paths.len() < 2 {
        bail!("a sweep needs at least two configs");
    }

    let mut configs = Vec::with_capacity(config_paths.len());
    for path in config_paths {
        let config = RunConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        configs.push(config);
    }

    // Every config must agree on the date range so the runs see the same bars.
    let (start, end) = (configs[0].start_date, configs[0].end_date);
    for config in &configs[1..] {
        if config.start_date != start || config.end_date != end {
            bail!(
                "all sweep configs must share one date range, got {} to {} and {} to {}",
                start,
                end,
                config.start_date,
                config.end_date
            );
        }
    }

    let bars = load_bars_csv(bars_path)
        .with_context(|| format!("loading bars {}", bars_path.display()))?;
    let bars = filter_range(bars, &configs[0]);

    let (reports, failures) = run_sweep(&configs, &bars);

    for (run_id, err) in &failures {
        eprintln!("Run {run_id} failed: {err}");
    }

    if reports.is_empty() {
        bail!("every run in the sweep failed");
    }

    print_ranking(&reports);

    std::fs::create_dir_all(output_dir)?;
    for report in &reports {
        let report_path = output_dir.join(format!("{}.json", report.run_id));
        write_report_json(report, &report_path)?;
    }
    println!();
    println!(
        "{} report(s) saved to: {}",
        reports.len(),
        output_dir.display()
    );

    if failures.is_empty() {
        Ok(())
    } else {
        bail!("{} run(s) failed", failures.len())
    }
}

/// Keep only bars inside the config's date range so the engine never sees
/// sessions the report does not claim to cover.
fn filter_range(bars: Vec<scalplab_core::Bar>, config: &RunConfig) -> Vec<scalplab_core::Bar> {
    bars.into_iter()
        .filter(|bar| {
            let day = bar.timestamp.date_naive();
            day >= config.start_date && day <= config.end_date
        })
        .collect()
}

fn print_summary(report: &BacktestReport) {
    let result = &report.result;
    let summary = &report.summary;

    println!();
    println!("=== Backtest Result ===");
    println!("Run ID:         {}", report.run_id);
    println!("Symbol:         {}", report.symbol);
    println!("Strategy:       {}", result.strategy);
    println!("Bars:           {}", result.bar_count);
    println!("Signals:        {}", result.signal_count);
    println!("Trades:         {}", summary.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Net Profit:     {:+.2}", summary.net_profit);
    println!("Win Rate:       {:.1}%", summary.win_rate * 100.0);
    println!("Profit Factor:  {:.2}", summary.profit_factor);
    println!("Max Drawdown:   {:.2}", summary.max_drawdown);
    println!("Final Balance:  {:.2}", result.account.balance);
    println!(
        "Evaluation:     {}",
        if result.account.evaluation_passed {
            "PASSED"
        } else {
            "not passed"
        }
    );
    if let Some(halt) = &result.halt {
        println!("Halted:         {halt:?}");
    }
    println!();
    println!("--- Skipped Entries ---");
    println!("Out of window:  {}", result.skips.out_of_window);
    println!("Loss capped:    {}", result.skips.loss_capped);
    println!("Throttled:      {}", result.skips.throttled);
    println!("Not sized:      {}", result.skips.not_sized);
}

fn print_ranking(reports: &[BacktestReport]) {
    println!();
    println!("=== Sweep Ranking ===");
    println!(
        "{:<4} {:<24} {:>8} {:>12} {:>8} {:>8}",
        "Rank", "Strategy", "Trades", "Net Profit", "Win %", "PF"
    );
    println!("{}", "-".repeat(70));
    for (rank, report) in reports.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>8} {:>12.2} {:>7.1}% {:>8.2}",
            rank + 1,
            report.result.strategy,
            report.summary.total_trades,
            report.summary.net_profit,
            report.summary.win_rate * 100.0,
            report.summary.profit_factor
        );
    }
}
