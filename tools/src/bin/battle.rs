use anyhow::{anyhow, bail, Context};
use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use rayon::prelude::*;
use spacejam_builtin_ai::PilotContext;
use spacejam_simulator::config::Config;
use spacejam_simulator::simulation::{Simulation, Status};
use spacejam_simulator::{color, rng};
use std::collections::BTreeMap;

/// Runs rounds between built-in pilots over a range of seeds.
#[derive(Parser, Debug)]
#[command()]
struct Arguments {
    /// Number of seeds to play, starting from the configured seed.
    #[arg(short, long, default_value_t = 10)]
    seeds: u32,

    /// Ticks after which an unfinished round counts as a draw.
    #[arg(short, long, default_value_t = 3000)]
    max_ticks: u32,

    /// JSON file overriding the default configuration.
    #[arg(short, long)]
    config: Option<String>,

    /// Names of the pilots taking part.
    #[arg(required = true, num_args = 2..)]
    pilots: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("battle=info"))
        .init();

    let args = Arguments::parse();
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {path:?}"))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };
    config.validate()?;
    for name in &args.pilots {
        spacejam_builtin_ai::load(name).map_err(|e| anyhow!(e))?;
    }

    log::info!(
        "Running {} rounds with pilots {:?}",
        args.seeds,
        args.pilots
    );
    let outcomes: Vec<(u32, anyhow::Result<Status>)> = (0..args.seeds)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed.wrapping_add(i);
            let mut config = config.clone();
            config.seed = seed;
            (seed, run_simulation(config, &args.pilots, args.max_ticks))
        })
        .collect();

    let mut wins: BTreeMap<&str, Vec<u32>> = args
        .pilots
        .iter()
        .map(|name| (name.as_str(), vec![]))
        .collect();
    let mut draws = vec![];
    for (seed, outcome) in outcomes {
        match outcome? {
            Status::Victory { name, .. } => {
                log::debug!("Seed {seed}: {name} wins");
                if let Some(seeds) = wins.get_mut(name.as_str()) {
                    seeds.push(seed);
                }
            }
            Status::Draw | Status::Running => draws.push(seed),
        }
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Pilot", "Wins", "Seeds"]);
    for (name, seeds) in &wins {
        table.add_row(vec![
            name.to_string(),
            seeds.len().to_string(),
            format!("{seeds:?}"),
        ]);
    }
    table.add_row(vec![
        "(draw)".to_string(),
        draws.len().to_string(),
        format!("{draws:?}"),
    ]);
    println!("{table}");

    match wins.iter().max_by_key(|(_, seeds)| seeds.len()) {
        Some((name, seeds))
            if wins.values().filter(|s| s.len() == seeds.len()).count() == 1 =>
        {
            log::info!("{} wins", name)
        }
        _ => log::info!("Draw"),
    }
    Ok(())
}

fn run_simulation(config: Config, pilots: &[String], max_ticks: u32) -> anyhow::Result<Status> {
    let seed = config.seed;
    let mut sim = Simulation::new(config);
    for name in pilots {
        let entry = spacejam_builtin_ai::load(name).map_err(|e| anyhow!(e))?;
        let Some(color) = color::parse_hex(entry.color) else {
            bail!("Pilot {name:?} has invalid color {:?}", entry.color);
        };
        let context = PilotContext {
            field_size: sim.config().field_size,
            spaceship_size: sim.config().spaceship_size,
            energy_regen: sim.config().energy_regen,
            scan_cost_factor: sim.config().scan_cost_factor,
            seed: rng::derive_seed(seed, name),
        };
        sim.spawn_spaceship(entry.create(&context), name, color)?;
    }

    while sim.status() == Status::Running && sim.tick() < max_ticks {
        sim.step();
    }
    Ok(sim.status())
}
