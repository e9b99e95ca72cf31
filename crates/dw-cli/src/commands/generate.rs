use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dw_core::TerrainType;

use super::GridArgs;

pub fn run(args: &GridArgs, stats: bool) -> Result<(), String> {
    let mut rng = args.rng();
    let grid = super::build_grid(args, &mut rng)?;

    println!(
        "  {} {}",
        format!("{0}x{0} grid", grid.size()).bold(),
        format!("(seed={}, generation {})", args.seed, grid.generation()).dimmed()
    );
    println!();
    for row in 0..grid.size() {
        println!("  {}", super::render_row(&grid, row, |_| None));
    }
    println!();

    if stats {
        let counts = grid.terrain_counts();
        let total = (grid.size() * grid.size()).max(1) as f64;
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Terrain", "Glyph", "Cells", "Share"]);
        for terrain in TerrainType::ALL {
            let count = counts.get(&terrain).copied().unwrap_or(0);
            table.add_row(vec![
                terrain.to_string(),
                terrain.glyph().to_string(),
                count.to_string(),
                format!("{:.1}%", 100.0 * count as f64 / total),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
