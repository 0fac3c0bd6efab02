//! Bulge-odds -- exact attack outcome odds for a defending hex.
//!
//! Resolves a single attack, sweeps every attacking power, propagates an
//! attack sequence, or evaluates a scenario file, writing a text report or
//! JSON to stdout. Logs go to stderr and follow `RUST_LOG`.

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bulge_odds::engine::{process, summarize, write_report, EngineResult};
use bulge_odds::force::{AttackSpec, ForceCounts, UnitKind, ALL_KINDS, COMBAT_KINDS, MIN_POWER};
use bulge_odds::scenario::{load_scenarios, run_scenarios, ScenarioReport};
use bulge_odds::sequence::{propagate, sweep_powers, MultiAttackResult, PowerSweep, SweepConfig};

/// Exact outcome odds for Battle of the Bulge hex attacks
#[derive(Parser, Debug)]
#[command(name = "bulge-odds", version)]
struct Cli {
    /// Emit JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// The defending hex.
#[derive(Args, Debug)]
struct ForceArgs {
    /// Defending infantry (0-6)
    #[arg(long, default_value_t = 1)]
    inf: u32,

    /// Defending tanks (0-6)
    #[arg(long, default_value_t = 0)]
    tnk: u32,

    /// Defending artillery (0-3)
    #[arg(long, default_value_t = 0)]
    art: u32,

    /// Supplies in the hex
    #[arg(long, default_value_t = 0)]
    supply: u32,

    /// Trucks in the hex
    #[arg(long, default_value_t = 0)]
    truck: u32,

    /// Defenders have no legal retreat
    #[arg(long)]
    no_retreat: bool,
}

impl ForceArgs {
    fn counts(&self) -> ForceCounts {
        ForceCounts::new(self.inf, self.tnk, self.art, self.supply, self.truck)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single attack
    Attack {
        /// Attacking power (1-12)
        #[arg(long)]
        power: u32,

        #[command(flatten)]
        force: ForceArgs,

        /// Include every distribution in the output
        #[arg(long)]
        full: bool,
    },

    /// Resolve the hex at every attacking power, with and without retreat
    Sweep {
        #[command(flatten)]
        force: ForceArgs,

        /// Worker threads (1 runs sequentially)
        #[arg(long, default_value_t = 4)]
        threads: usize,
    },

    /// Propagate the hex through a sequence of attacks
    Multi {
        /// Comma-separated attack powers, in resolution order (at most 6)
        #[arg(long, value_delimiter = ',', required = true)]
        attacks: Vec<u32>,

        #[command(flatten)]
        force: ForceArgs,
    },

    /// Evaluate every scenario in a JSON file
    Scenario {
        /// Path to the scenario file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let status = match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    };
    if let Err(e) = out.flush() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    status
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "bulge_odds=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Attack { power, force, full } => {
            let spec = AttackSpec::from_force(*power, force.counts(), !force.no_retreat)?;
            let result = process(&spec)?;
            if cli.json {
                if *full {
                    write_json(out, &result)?;
                } else {
                    write_json(out, &summarize(&result))?;
                }
            } else {
                write_report(&summarize(&result), out)?;
                if *full {
                    write_distributions(out, &result)?;
                }
            }
        }
        Command::Sweep { force, threads } => {
            let config = SweepConfig {
                threads: *threads,
                quiet: false,
            };
            let sweep = sweep_powers(&force.counts(), &config)?;
            if cli.json {
                write_json(out, &sweep)?;
            } else {
                write_sweep(out, &sweep)?;
            }
        }
        Command::Multi { attacks, force } => {
            let spec = AttackSpec::from_force(MIN_POWER, force.counts(), !force.no_retreat)?;
            let result = propagate(&spec, attacks)?;
            if cli.json {
                write_json(out, &result)?;
            } else {
                write_multi(out, attacks, &result)?;
            }
        }
        Command::Scenario { file } => {
            let scenarios = load_scenarios(file)?;
            let reports = run_scenarios(&scenarios)?;
            if cli.json {
                write_json(out, &reports)?;
            } else {
                write_scenarios(out, &reports)?;
            }
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_distributions<W: Write>(out: &mut W, result: &EngineResult) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "POWER LEFT")?;
    for e in &result.power_left_distribution {
        writeln!(out, "  {:>2}  {:.4}", e.power_left, e.probability)?;
    }

    writeln!(out)?;
    writeln!(out, "UNITS LEFT ({})", labels(&ALL_KINDS))?;
    for e in &result.units_left_distribution {
        let u = &e.units;
        writeln!(
            out,
            "  {} {} {} {} {}  {:.4}{}",
            u.inf,
            u.tnk,
            u.art,
            u.supply,
            u.truck,
            e.probability,
            if e.evacuate { "  evacuated" } else { "" }
        )?;
    }

    writeln!(out)?;
    writeln!(out, "UNITS DESTROYED ({})", labels(&COMBAT_KINDS))?;
    for e in &result.unit_destroyed_distribution {
        writeln!(
            out,
            "  {} {} {}  power {:>2}  {:.4}",
            e.inf_destroyed, e.tnk_destroyed, e.art_destroyed, e.total_power_destroyed, e.probability
        )?;
    }

    writeln!(out)?;
    writeln!(out, "POWER DESTROYED (p, or more, or less)")?;
    for e in &result.total_power_destroyed_distribution {
        writeln!(
            out,
            "  {:>2}  {:.4}  {:.4}  {:.4}",
            e.power_destroyed, e.probability, e.or_more, e.or_less
        )?;
    }
    Ok(())
}

/// Space-separated column labels for a table header.
fn labels(kinds: &[UnitKind]) -> String {
    kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(" ")
}

fn write_sweep<W: Write>(out: &mut W, sweep: &PowerSweep) -> io::Result<()> {
    writeln!(out, "power  p_evacuate  destroyed_retreat  destroyed_no_retreat")?;
    for evac in &sweep.evacuate {
        let destroyed = |retreat: bool| {
            sweep
                .destroy
                .iter()
                .find(|d| d.power == evac.power && d.retreat == retreat)
                .map(|d| d.exp_power_destroyed)
                .unwrap_or(0.0)
        };
        writeln!(
            out,
            "{:>5}  {:>10.3}  {:>17.3}  {:>20.3}",
            evac.power,
            evac.p_evacuate,
            destroyed(true),
            destroyed(false)
        )?;
    }
    Ok(())
}

fn write_multi<W: Write>(out: &mut W, attacks: &[u32], result: &MultiAttackResult) -> io::Result<()> {
    writeln!(out, "EVACUATION PROBABILITY: {:.3}", result.prob_evacuate)?;
    writeln!(out, "EXPECTED POWER DESTROYED: {:.3}", result.exp_power_destroyed)?;
    for (i, (power, p)) in attacks.iter().zip(&result.evacuated_by_attack).enumerate() {
        writeln!(out, "  attack {} (power {:>2}): {:.3}", i + 1, power, p)?;
    }
    Ok(())
}

fn write_scenarios<W: Write>(out: &mut W, reports: &[ScenarioReport]) -> io::Result<()> {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "== {}", report.name)?;
        write_report(&report.summary, out)?;
        if let Some(multi) = &report.multi_attack {
            writeln!(out, "MULTI-ATTACK EVACUATION PROBABILITY: {:.3}", multi.prob_evacuate)?;
        }
    }
    Ok(())
}
