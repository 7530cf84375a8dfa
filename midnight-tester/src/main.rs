mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use common::{OutputTarget, generated_at, split_csv};
use logic::{
    SamplingReport, SimulationConfig, SimulationReport, parse_strategies, resolve_seed_inputs,
    run_sampling, run_simulations,
};
use midnight_game::WagerRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WagerRuleArg {
    /// One ante to play, one more when the hand qualifies
    Adds,
    /// Two antes to play, one refunded when the hand qualifies
    Saves,
}

impl From<WagerRuleArg> for WagerRule {
    fn from(value: WagerRuleArg) -> Self {
        match value {
            WagerRuleArg::Adds => Self::QualifierAddsAnte,
            WagerRuleArg::Saves => Self::QualifierSavesAnte,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "midnight-sim", version)]
#[command(about = "Seeded batch simulations of the Midnight dice game")]
struct Args {
    /// Rounds to play per seed
    #[arg(long, default_value_t = 10_000)]
    rounds: u32,

    /// Players seated at the table
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Strategies (comma-separated), cycled across the players
    #[arg(long, default_value = "conservative")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated integers, or `random`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Starting chips for every player
    #[arg(long, default_value_t = 1_000)]
    initial_stake: i64,

    /// How qualifying changes a player's wager
    #[arg(long, value_enum, default_value_t = WagerRuleArg::Adds)]
    wager_rule: WagerRuleArg,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Print each strategy's standalone score histogram over N hands instead of playing games
    #[arg(long, value_name = "N")]
    sample: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner(&args);

    let start_time = Instant::now();
    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;

    if let Some(samples) = args.sample {
        return write_sampling(&args, samples, seed_infos[0].seed);
    }

    let strategies = parse_strategies(&split_csv(&args.strategies))?;
    let config = SimulationConfig::new(args.rounds, args.players, strategies)
        .with_initial_stake(args.initial_stake)
        .with_wager_rule(args.wager_rule.into());

    if args.verbose {
        let labels: Vec<&str> = config.seat_strategies().iter().map(|s| s.label()).collect();
        eprintln!(
            "🎲 {} seed(s) x {} rounds, seats: {}",
            seed_infos.len(),
            config.rounds,
            labels.join(", ")
        );
    }

    let runs = run_simulations(&config, &seed_infos)?;
    let report = SimulationReport {
        generated_at: generated_at(),
        rounds: config.rounds,
        players: config.players,
        wager_rule: config.wager_rule,
        runs,
    };
    write_reports(&args, &report, start_time)
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    logic::reports::write_strategy_list(output_target.writer())?;
    output_target.flush_inner()?;
    Ok(true)
}

/// Machine-readable reports on stdout stay clean of the banner.
fn wants_banner(args: &Args) -> bool {
    args.output.is_some() || args.report == "console"
}

fn announce_banner(args: &Args) {
    if !wants_banner(args) {
        return;
    }
    println!("{}", "🎲 Midnight Simulator".bright_cyan().bold());
    println!("{}", "=====================".cyan());
}

fn write_sampling(args: &Args, samples: usize, seed: u64) -> Result<()> {
    let report = SamplingReport {
        generated_at: generated_at(),
        seed,
        samples,
        strategies: run_sampling(samples, seed)?,
    };
    let mut output_target = OutputTarget::new(args.output.clone())?;
    logic::reports::generate_sampling_report(output_target.writer(), &report, &args.report)?;
    output_target
        .flush_inner()
        .context("failed to flush sampling report")?;
    Ok(())
}

fn write_reports(args: &Args, report: &SimulationReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(output_target.writer(), report)?,
        "markdown" => logic::reports::generate_markdown_report(output_target.writer(), report)?,
        "csv" => logic::reports::generate_csv_report(output_target.writer(), report)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(output_target.writer(), report, duration)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target
        .flush_inner()
        .context("failed to flush report")?;
    Ok(())
}
