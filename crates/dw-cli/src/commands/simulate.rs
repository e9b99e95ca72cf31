use std::time::Duration;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dw_core::random::random_probability;
use dw_core::{Body, Mover, Node, Oriented, Vector, World};
use dw_simulation::{KinematicsSystem, Scheduler, SchedulerConfig, VirtualClock, WallClock};

use super::GridArgs;

const MAX_VELOCITY: f64 = 2.0;
const MAX_ACCELERATION: f64 = 1.0;

pub fn run(
    args: &GridArgs,
    ticks: u64,
    movers: usize,
    frame_ms: u64,
    realtime: bool,
) -> Result<(), String> {
    if ticks == 0 {
        return Err("--ticks must be at least 1".into());
    }
    let mut rng = args.rng();
    let mut world = World::new(super::build_grid(args, &mut rng)?);

    for _ in 0..movers {
        let Some(cell) = world.grid().random_open_cell(&mut rng) else {
            return Err("grid has no open cells to place movers on".into());
        };
        let position = Vector::new(f64::from(cell.x) + 0.5, f64::from(cell.y) + 0.5);
        let mut random_vector = |scale: f64| {
            let x = random_probability(&mut rng) * 2.0 - 1.0;
            let y = random_probability(&mut rng) * 2.0 - 1.0;
            scale * Vector::new(x, y)
        };
        let mover = Mover::at(position, MAX_VELOCITY, MAX_ACCELERATION)
            .with_velocity(random_vector(MAX_VELOCITY / 2.0))
            .with_acceleration(random_vector(MAX_ACCELERATION));
        let heading = mover.velocity.y.atan2(mover.velocity.x);
        world.add_node(
            Node::new()
                .with(mover)
                .with(Oriented { bearing: heading })
                .with(Body {
                    radius: 0.4,
                    mass: 1.0,
                }),
        );
    }

    let frame = Duration::from_millis(frame_ms);
    let config = SchedulerConfig::default()
        .with_seed(args.seed)
        .with_nominal_frame(frame)
        .with_min_tick_interval(frame)
        .with_tick_budget(ticks);
    let scheduler = Scheduler::new(world, config);
    let mut scheduler = if realtime {
        scheduler.with_tick_source(WallClock::new())
    } else {
        scheduler.with_tick_source(VirtualClock::new())
    };
    scheduler
        .add_system(KinematicsSystem::new())
        .map_err(|e| e.to_string())?;
    scheduler
        .start()
        .map_err(|e| format!("simulation error: {e}"))?;

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} ticks, {movers} movers, seed={}, {frame_ms} ms/tick, {})",
            scheduler.ticks(),
            args.seed,
            if realtime { "wall clock" } else { "virtual clock" }
        )
        .dimmed()
    );
    println!("  Scheduler {}", scheduler.state());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Node", "Position", "Velocity", "Speed", "Acceleration"]);
    for node in scheduler.world().nodes() {
        let Some(mover) = node.mover() else {
            continue;
        };
        table.add_row(vec![
            node.id().to_string(),
            format_vector(mover.position),
            format_vector(mover.velocity),
            format!("{:.3}", mover.speed()),
            format_vector(mover.acceleration),
        ]);
    }
    println!("{table}");

    Ok(())
}

fn format_vector(v: Vector) -> String {
    format!("({:.2}, {:.2})", v.x, v.y)
}
