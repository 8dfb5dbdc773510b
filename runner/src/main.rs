// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for resolving and sampling march turns
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use got_march_engine::navigation::candidate_orders;
use got_march_engine::setup::SAMPLE_SCENARIO;
use got_march_engine::{resolve_turn, seeded_rng, ArmyId, Scenario, TurnError, TurnEvent, TurnReport, World};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "got-march", about = "Resolve simultaneous march orders and the battles they start")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the scenario's orders as one turn
    Resolve {
        /// Scenario TOML file (defaults to the bundled sample)
        #[arg(short = 'f', long)]
        scenario: Option<PathBuf>,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Print the report and final armies as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the legal orders for one army
    Orders {
        #[arg(short = 'f', long)]
        scenario: Option<PathBuf>,
        #[arg(short, long)]
        army: String,
    },
    /// Resolve the same turn over many seeds and tally combat outcomes
    Simulate {
        #[arg(short = 'f', long)]
        scenario: Option<PathBuf>,
        #[arg(short, long, default_value_t = 1000)]
        runs: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the bundled sample scenario
    Sample,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Resolve { scenario, seed, json } => cmd_resolve(scenario, seed, json),
        Commands::Orders { scenario, army } => cmd_orders(scenario, &army),
        Commands::Simulate { scenario, runs, seed } => cmd_simulate(scenario, runs, seed),
        Commands::Sample => {
            print!("{SAMPLE_SCENARIO}");
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

fn load(path: Option<PathBuf>) -> Result<Scenario, Box<dyn Error>> {
    let scenario = match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading scenario");
            Scenario::load(p)?
        }
        None => Scenario::sample()?,
    };
    Ok(scenario)
}

fn run_turn(world: &mut World, scenario: &Scenario, seed: u64) -> Result<TurnReport, TurnError> {
    let World { graph, diplomacy, armies, rules } = world;
    let ctx = got_march_engine::TurnContext::new(graph, diplomacy, rules);
    resolve_turn(ctx, armies, &scenario.orders(), &mut seeded_rng(seed))
}

fn cmd_resolve(path: Option<PathBuf>, seed: u64, json: bool) -> Result<(), Box<dyn Error>> {
    let scenario = load(path)?;
    let mut world = scenario.build()?;
    let report = run_turn(&mut world, &scenario, seed)?;
    tracing::info!(seed, events = report.events.len(), battles = report.battles.len(), "turn resolved");

    if json {
        let out = serde_json::json!({ "seed": seed, "report": report, "armies": world.armies });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("=== March turn, seed={} ===\n", seed);
    println!("Events:");
    for event in &report.events {
        match event {
            TurnEvent::March(m) => println!("  {:<24} {:>12} -> {:<12} {}", m.context.to_string(), m.src, m.dst, m.army),
            TurnEvent::Combat(c) => println!("  {:<24} {} by {}", c.outcome.to_string(), c.target, c.by),
        }
    }
    if !report.cancelled.is_empty() {
        println!("\nCancelled:");
        for c in &report.cancelled {
            println!("  {} ({:?})", c.order.army, c.reason);
        }
    }

    println!("\nArmies:");
    println!("  {:<12} {:<12} {:<14} {:>5} {:>7} {:>9}  supply", "Army", "House", "Region", "Size", "Morale", "Strength");
    println!("  {}", "-".repeat(72));
    for army in world.armies.values() {
        println!(
            "  {:<12} {:<12} {:<14} {:>5} {:>7} {:>9}  {:?}",
            army.id.as_str(),
            army.house.as_str(),
            army.region.as_str(),
            army.size,
            army.morale,
            army.strength(),
            army.supply,
        );
    }
    Ok(())
}

fn cmd_orders(path: Option<PathBuf>, army: &str) -> Result<(), Box<dyn Error>> {
    let scenario = load(path)?;
    let world = scenario.build()?;
    let id = ArmyId::new(army);
    if !world.armies.contains_key(&id) {
        return Err(format!("unknown army {army}").into());
    }

    let orders = candidate_orders(&world.graph, &world.diplomacy, &world.armies, &id);
    println!("Orders for {}:", army);
    for order in &orders {
        println!("  {} {} -> {}", order.context, order.src, order.dst);
    }
    Ok(())
}

fn cmd_simulate(path: Option<PathBuf>, runs: u64, seed: u64) -> Result<(), Box<dyn Error>> {
    let scenario = load(path)?;
    let world = scenario.build()?;
    println!("=== Simulating {} turns from seed {} ===\n", runs, seed);

    let reports: Vec<(TurnReport, World)> = (0..runs)
        .into_par_iter()
        .map(|i| -> Result<(TurnReport, World), TurnError> {
            let mut w = world.clone();
            let report = run_turn(&mut w, &scenario, seed.wrapping_add(i))?;
            Ok((report, w))
        })
        .collect::<Result<_, TurnError>>()?;

    let mut outcomes: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut cut_off: BTreeMap<String, u64> = BTreeMap::new();
    for (report, w) in &reports {
        for c in report.combat_events() {
            *outcomes.entry((c.target.to_string(), c.outcome.to_string())).or_insert(0) += 1;
        }
        for army in w.armies.values().filter(|a| a.is_cut_off()) {
            *cut_off.entry(army.id.to_string()).or_insert(0) += 1;
        }
    }

    println!("Combat outcomes:");
    for ((target, outcome), n) in &outcomes {
        let pct = if runs > 0 { *n as f64 / runs as f64 * 100.0 } else { 0.0 };
        println!("  {:<12} {:<10} {:>6} ({:.1}%)", target, outcome, n, pct);
    }
    if !cut_off.is_empty() {
        println!("\nCut off after the turn:");
        for (army, n) in &cut_off {
            println!("  {:<12} {:>6}", army, n);
        }
    }
    Ok(())
}
