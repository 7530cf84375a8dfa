use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use midnight_game::{StrategyId, WagerRule};

use super::simulation::{SimulationRun, StrategySample};

/// Everything a report renders, independent of format.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub generated_at: String,
    pub rounds: u32,
    pub players: usize,
    pub wager_rule: WagerRule,
    pub runs: Vec<SimulationRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SamplingReport {
    pub generated_at: String,
    pub seed: u64,
    pub samples: usize,
    pub strategies: Vec<StrategySample>,
}

fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn generate_console_report(
    writer: &mut dyn Write,
    report: &SimulationReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Midnight Simulation Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;
    writeln!(writer, "Generated: {}", report.generated_at)?;
    writeln!(
        writer,
        "Seeds: {}  Rounds per seed: {}  Players: {}  Wager rule: {}",
        report.runs.len(),
        report.rounds,
        report.players,
        report.wager_rule.label()
    )?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for run in &report.runs {
        let stats = &run.stats;
        writeln!(
            writer,
            "{} {} ({})",
            "🎲 Seed".bold(),
            run.seed.seed.to_string().bold(),
            run.fingerprint.dimmed()
        )?;
        for player in &stats.players {
            let stake = if player.relative_stake >= 0 {
                format!("{:+}", player.relative_stake).green()
            } else {
                format!("{:+}", player.relative_stake).red()
            };
            writeln!(
                writer,
                "   {:10} {:18} wins {:>7}  qualified {:>7}  mean score {:>5.2}  stake {}",
                player.name,
                player.strategy,
                pct(player.win_rate),
                pct(player.qualification_rate),
                player.mean_score,
                stake
            )?;
        }
        writeln!(
            writer,
            "   {:29} {:>7}  mean pot {:.2}  max pot {}  unclaimed {}",
            "Tie".yellow(),
            pct(stats.tie_rate),
            stats.mean_pot,
            stats.max_pot,
            stats.unclaimed_pot
        )?;
        writeln!(writer, "   Run time: {:?}", run.duration)?;
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_json_report(writer: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(writer: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(writer, "# Midnight Simulation Results\n")?;
    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Generated**: {}", report.generated_at)?;
    writeln!(writer, "- **Seeds**: {}", report.runs.len())?;
    writeln!(writer, "- **Rounds per seed**: {}", report.rounds)?;
    writeln!(writer, "- **Players**: {}", report.players)?;
    writeln!(writer, "- **Wager rule**: {}\n", report.wager_rule.label())?;

    for run in &report.runs {
        let stats = &run.stats;
        writeln!(writer, "## Seed {}\n", run.seed.seed)?;
        writeln!(writer, "Fingerprint `{}`\n", run.fingerprint)?;
        writeln!(
            writer,
            "| Player | Strategy | Wins | Win rate | Qualified | Mean score | Relative stake |"
        )?;
        writeln!(writer, "|---|---|---|---|---|---|---|")?;
        for p in &stats.players {
            writeln!(
                writer,
                "| {} | {} | {} | {} | {} | {:.2} | {} |",
                p.name,
                p.strategy,
                p.wins,
                pct(p.win_rate),
                pct(p.qualification_rate),
                p.mean_score,
                p.relative_stake
            )?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "- **Ties**: {} ({})\n- **Mean pot**: {:.2}\n- **Max pot**: {}\n",
            stats.ties,
            pct(stats.tie_rate),
            stats.mean_pot,
            stats.max_pot
        )?;
    }
    Ok(())
}

pub fn generate_csv_report(writer: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(
        writer,
        "seed,player,strategy,rounds,wins,win_rate,qualification_rate,mean_score,relative_stake,ties,tie_rate,mean_pot,max_pot,fingerprint"
    )?;
    for run in &report.runs {
        let stats = &run.stats;
        for p in &stats.players {
            writeln!(
                writer,
                "{},{},{},{},{},{:.4},{:.4},{:.4},{},{},{:.4},{:.4},{},{}",
                run.seed.seed,
                p.name,
                p.strategy,
                p.rounds,
                p.wins,
                p.win_rate,
                p.qualification_rate,
                p.mean_score,
                p.relative_stake,
                stats.ties,
                stats.tie_rate,
                stats.mean_pot,
                stats.max_pot,
                run.fingerprint
            )?;
        }
    }
    Ok(())
}

pub fn generate_sampling_report(
    writer: &mut dyn Write,
    report: &SamplingReport,
    format: &str,
) -> Result<()> {
    match format {
        "json" => {
            writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
        }
        "csv" => {
            writeln!(writer, "strategy,score,count")?;
            for sample in &report.strategies {
                for (score, count) in sample.histogram.iter() {
                    writeln!(writer, "{},{score},{count}", sample.strategy)?;
                }
            }
        }
        "markdown" => {
            writeln!(writer, "# Midnight Strategy Sampling\n")?;
            writeln!(
                writer,
                "{} hands per strategy, seed {}, generated {}\n",
                report.samples, report.seed, report.generated_at
            )?;
            writeln!(writer, "| Strategy | Qualified | Mean score |")?;
            writeln!(writer, "|---|---|---|")?;
            for sample in &report.strategies {
                writeln!(
                    writer,
                    "| {} | {} | {:.2} |",
                    sample.strategy,
                    pct(sample.histogram.qualification_rate()),
                    sample.histogram.mean()
                )?;
            }
        }
        _ => {
            writeln!(writer, "{}", "🎯 Strategy Sampling".bright_cyan().bold())?;
            writeln!(writer, "{}", "===================".cyan())?;
            for sample in &report.strategies {
                let hist = &sample.histogram;
                writeln!(
                    writer,
                    "{} qualified {} mean {:.2}",
                    sample.strategy.label().bold(),
                    pct(hist.qualification_rate()),
                    hist.mean()
                )?;
                let widest = hist.iter().map(|(_, c)| c).max().unwrap_or(1).max(1);
                for (score, count) in hist.iter() {
                    let bar = "#".repeat(count * 40 / widest);
                    writeln!(writer, "   {:>2} {:>7} {}", score.value(), count, bar.green())?;
                }
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}

/// Lines printed by `--list-strategies`.
pub fn write_strategy_list(writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "Available strategies:")?;
    for id in StrategyId::all() {
        writeln!(writer, "  {:18} - {}", id.label(), id.description())?;
    }
    Ok(())
}
