use std::collections::HashSet;
use std::sync::Arc;

use colored::Colorize;
use dw_core::Point;
use dw_simulation::navigation::{self, DistanceFn, NavigationOutcome};
use dw_simulation::Navigator;
use rand::rngs::StdRng;

use super::GridArgs;

pub fn run(
    args: &GridArgs,
    from: Option<Point>,
    to: Option<Point>,
    distance: &str,
) -> Result<(), String> {
    let distance: DistanceFn = match distance {
        "euclidean" => navigation::euclidean,
        "manhattan" => navigation::manhattan,
        "chebyshev" => navigation::chebyshev,
        other => {
            return Err(format!(
                "unknown distance '{other}' (expected euclidean, manhattan or chebyshev)"
            ));
        }
    };

    let mut rng = args.rng();
    let grid = Arc::new(super::build_grid(args, &mut rng)?);

    let pick = |given: Option<Point>, rng: &mut StdRng| match given {
        Some(p) => Ok(p),
        None => grid
            .random_open_cell(rng)
            .ok_or_else(|| "grid has no open cells".to_string()),
    };
    let start = pick(from, &mut rng)?;
    let target = pick(to, &mut rng)?;
    for (label, point) in [("start", start), ("target", target)] {
        if !grid.is_valid_cell(point) {
            return Err(format!("{label} {point} is outside the {0}x{0} grid", grid.size()));
        }
        if grid.is_wall(point) {
            return Err(format!("{label} {point} is a wall"));
        }
    }

    let task = Navigator::on_grid(start, target, Arc::clone(&grid))
        .with_distance(distance)
        .spawn()
        .map_err(|e| e.to_string())?;
    let result = task.wait();

    match (&result.outcome, &result.path) {
        (NavigationOutcome::Found, Some(path)) => {
            println!(
                "  {} {} -> {}: {} cells, {} expanded",
                "Path found".green().bold(),
                start,
                target,
                path.len(),
                result.expanded
            );
            println!();
            let on_path: HashSet<Point> = path.iter().copied().collect();
            for row in 0..grid.size() {
                let line = super::render_row(&grid, row, |p| {
                    if p == start {
                        Some("S".green().bold())
                    } else if p == target {
                        Some("T".red().bold())
                    } else if on_path.contains(&p) {
                        Some("*".cyan())
                    } else {
                        None
                    }
                });
                println!("  {line}");
            }
        }
        (outcome, _) => {
            println!(
                "  {} {} -> {}: search {} after {} expanded",
                "No path".yellow().bold(),
                start,
                target,
                outcome,
                result.expanded
            );
        }
    }

    Ok(())
}
