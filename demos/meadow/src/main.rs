//! meadow: a small pasture with sheep, a wolf, and a barn.
//!
//! Sheep graze, wander, and look around; they run from the wolf and from
//! whatever hurts them.  At dusk each sheep's `go_home` activity pauses its
//! tasks and walks it back to the barn.  The wolf stalks the nearest sheep.
//!
//! ```text
//! cargo run -p meadow -- [OUTPUT_DIR]
//! RUST_LOG=ai_sched=debug cargo run -p meadow
//! ```
//!
//! With an output directory the run writes the lifecycle event, tick
//! summary, and snapshot CSVs there.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_activity::parse_activities;
use ai_core::{AgentId, SimConfig, Vec3};
use ai_output::{CsvTraceWriter, TraceObserver};
use ai_registry::{TaskRegistry, parse_task_specs};
use ai_sim::{AgentSetup, NoopObserver, World, WorldBuilder};
use ai_task::DamageSource;

// ── Constants ─────────────────────────────────────────────────────────────────

const SHEEP_COUNT:           usize = 6;
const SEED:                  u64   = 7;
const DT_SECS:               f32   = 0.05; // 20 ticks per second
const TOTAL_TICKS:           u64   = 20 * 120;
const OUTPUT_INTERVAL_TICKS: u64   = 20;
/// A full day lasts four minutes, so dusk falls inside the run.
const DAY_LENGTH_SECS:       f64   = 240.0;
const BARN:                  Vec3  = Vec3 { x: -20.0, y: 0.0, z: 0.0 };

// ── Task lists ────────────────────────────────────────────────────────────────

const SHEEP_TASKS: &str = r#"[
  { "code": "fleeentity", "slot": 0, "priority": 3,
    "config": { "entityKinds": ["wolf"], "seekingRange": 8, "safeDistance": 14,
                "sound": { "location": "creature/sheep/bleat" } } },
  { "code": "wander", "slot": 0, "priority": 1,
    "config": { "chance": 0.05, "range": 6, "moveSpeed": 1.2 } },
  { "code": "idle", "slot": 0, "priority": 0.5,
    "config": { "chance": 0.2, "minDuration": 2, "maxDuration": 5 } },
  { "code": "lookaround", "slot": 1, "priority": 0.3,
    "config": { "entityKinds": ["sheep", "wolf"] } }
]"#;

const WOLF_TASKS: &str = r#"[
  { "code": "seekentity", "slot": 0, "priority": 2,
    "config": { "entityKinds": ["sheep"], "seekingRange": 25, "moveSpeed": 2.5,
                "sound": { "location": "creature/wolf/growl", "range": 32 } } },
  { "code": "wander", "slot": 0, "priority": 1,
    "config": { "range": 10 } }
]"#;

// Hours 19:00 to 06:00 count as night.
const SHEEP_ACTIVITIES: &str = r#"[
  { "code": "go_home", "priority": 1, "severity": "hard", "cooldownSecs": 30,
    "abortWhenFalse": true,
    "conditions": [ { "type": "timeOfDay", "fromHour": 19, "toHour": 6 } ],
    "actions": [
      { "type": "playSound", "location": "creature/sheep/baa" },
      { "type": "goTo", "target": { "x": -20, "y": 0, "z": 0 }, "speed": 2,
        "tolerance": 1.5, "timeoutSecs": 60 },
      { "type": "playAnimation", "code": "sleep", "secs": 30 }
    ] }
]"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let out_dir = std::env::args().nth(1).map(PathBuf::from);

    // 1. Registry and task lists.
    let mut registry = TaskRegistry::new();
    ai_tasks::register_defaults(&mut registry);
    let sheep_tasks = parse_task_specs(SHEEP_TASKS)?;
    let wolf_tasks = parse_task_specs(WOLF_TASKS)?;
    let sheep_activities = parse_activities(SHEEP_ACTIVITIES)?;

    // 2. World.
    let config = SimConfig {
        dt_secs:               DT_SECS,
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        num_threads:           None,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };
    let mut builder = WorldBuilder::new(config)
        .bounds(40.0)
        .day_length(DAY_LENGTH_SECS)
        .prop("barn", BARN);
    for i in 0..SHEEP_COUNT {
        let angle = i as f32 / SHEEP_COUNT as f32 * std::f32::consts::TAU;
        let pos = Vec3::new(angle.cos() * 6.0, 0.0, angle.sin() * 6.0);
        builder = builder.agent(
            AgentSetup::new("sheep", pos)
                .specs(sheep_tasks.clone())
                .activities(sheep_activities.clone()),
        );
    }
    builder = builder.agent(AgentSetup::new("wolf", Vec3::new(30.0, 0.0, 30.0)).specs(wolf_tasks));
    let mut world = builder.build_with(&registry)?;
    let wolf = AgentId::try_from(world.len() - 1)?;
    info!(entities = world.len(), ticks = TOTAL_TICKS, "meadow ready");

    // 3. Run the first half, bite a sheep, then run the rest.
    let t0 = Instant::now();
    match &out_dir {
        Some(dir) => {
            let mut obs = TraceObserver::new(CsvTraceWriter::new(dir)?);
            run_with_bite(&mut world, wolf, &mut obs)?;
            if let Some(e) = obs.take_error() {
                warn!(error = %e, "trace output incomplete");
            }
            info!(dir = %dir.display(), "trace written");
        }
        None => run_with_bite(&mut world, wolf, &mut NoopObserver)?,
    }
    info!(elapsed_secs = t0.elapsed().as_secs_f64(), "simulation complete");

    // 4. Final state table.
    println!("{:<6} {:<8} {:>8} {:>8} {:<24} {:<10}", "Id", "Kind", "X", "Z", "Running", "Activity");
    println!("{}", "-".repeat(70));
    for s in world.snapshot() {
        println!(
            "{:<6} {:<8} {:>8.2} {:>8.2} {:<24} {:<10}",
            s.id.0,
            s.kind,
            s.position.x,
            s.position.z,
            s.running.join(","),
            s.activity.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

fn run_with_bite<O: ai_sim::WorldObserver>(world: &mut World, wolf: AgentId, obs: &mut O) -> Result<()> {
    world.run_ticks(TOTAL_TICKS / 2, obs)?;

    let bite = DamageSource {
        kind:     "attack".to_owned(),
        attacker: Some(wolf),
        position: world.position(wolf),
    };
    // Sheep ids start after the barn.
    world.hurt(AgentId(1), &bite, 2.0)?;
    info!(tick = world.clock.tick, "wolf bit sheep 1");

    world.run(obs)?;
    Ok(())
}
