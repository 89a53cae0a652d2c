// Scenario runner: builds a world from a built-in scene or a JSON descriptor,
// steps it at a fixed dt, prints a status line every N ticks and the final
// state digest. Telemetry can be streamed to a JSONL ledger file.

mod scenario;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scenario::{builtin, load, validate_and_build, Builtin};
use starhelm_core::digest_hex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "starhelm-bench", version, about = "Run a steering/avoidance scenario at a fixed step")]
struct Opts {
    /// Scenario JSON; overrides --builtin
    scenario: Option<PathBuf>,

    /// Built-in scene to run when no file is given
    #[arg(long, value_enum, default_value_t = Builtin::Rock)]
    builtin: Builtin,

    /// Override the scenario tick count
    #[arg(long)]
    ticks: Option<u32>,

    /// Override the scenario step (s)
    #[arg(long)]
    dt: Option<f32>,

    /// Status line interval in ticks (0 = only the summary)
    #[arg(long, default_value_t = 50)]
    print_every: u32,

    /// Write the telemetry ledger here as JSONL
    #[arg(long)]
    ledger: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let mut sd = match &opts.scenario {
        Some(path) => load(path)?,
        None => builtin(opts.builtin),
    };
    if let Some(t) = opts.ticks { sd.ticks = t; }
    if let Some(dt) = opts.dt { sd.dt = dt; }

    let (mut world, _) = validate_and_build(&sd, opts.ledger.is_some()).context("build scenario")?;
    info!(ships = world.ship_ids().count(), bodies = world.num_bodies(), ticks = sd.ticks, dt = sd.dt, "scenario ready");

    let mut ledger_out = match &opts.ledger {
        Some(p) => Some(BufWriter::new(File::create(p).with_context(|| format!("create {}", p.display()))?)),
        None => None,
    };

    let mut total_collisions: u64 = 0;
    let mut skipped: u64 = 0;
    let ticks = u64::from(sd.ticks);
    while world.tick_index() < ticks {
        let stats = world.step(sd.dt);
        let t = world.tick_index();
        total_collisions += stats.possible_collisions as u64;
        skipped += stats.skipped as u64;

        let flush = opts.print_every > 0 && t % u64::from(opts.print_every) == 0;
        if flush {
            for id in world.ship_ids() {
                let pose = world.get_body_pose(id);
                let speed = world.engine(id).map(|e| e.speed()).unwrap_or(0.0);
                println!(
                    "t={:5} ship={} pos=({:8.3},{:8.3},{:8.3}) speed={:6.3} collisions={}",
                    t, id.0, pose.pos.x, pose.pos.y, pose.pos.z, speed, stats.possible_collisions
                );
            }
        }
        if let Some(w) = ledger_out.as_mut() {
            if flush || t == ticks {
                if world.ledger().dropped() > 0 {
                    warn!(tick = t, dropped = world.ledger().dropped(), "ledger full, events dropped");
                }
                world.ledger().write_jsonl(&mut *w).context("write ledger")?;
                world.ledger_mut().clear();
            }
        }
    }

    if let Some(mut w) = ledger_out {
        w.flush().context("flush ledger")?;
    }

    println!("ticks:      {}", sd.ticks);
    println!("collisions: {}", total_collisions);
    println!("skipped:    {}", skipped);
    println!("digest:     {}", digest_hex(&world.step_hash()));
    Ok(())
}
