//! Example: Generate a tissue lattice
//!
//! Demonstrates the basic usage of the generation pipeline.

use tissue_lattice::*;

fn main() {
    println!("Tissue Lattice Generation Example");
    println!("=================================\n");

    let config = LatticeConfigBuilder::new()
        .seed(42)
        .cells(12, 10)
        .seed_jitter(0.15)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Grid: {} x {} ({} seeds)", config.cells_x, config.cells_y, config.seed_count());
    println!("  Spatial step: {}", config.spatial_step);
    println!("  Max edge length: {}", config.max_edge_length);
    println!();

    println!("Generating lattice...");
    let lattice = Lattice::generate(config).expect("Failed to generate lattice");
    let mesh = lattice.mesh();

    println!(
        "Bounded regions: {} of {}",
        lattice.tessellation().bounded_region_count(),
        lattice.seeds().len()
    );
    println!(
        "Mesh: {} vertices, {} edges, {} cells ({} skipped)\n",
        mesh.vertices().len(),
        mesh.edges().len(),
        mesh.cells().len(),
        mesh.skipped_cells().len()
    );

    let total_sides: usize = mesh.cells().iter().map(|c| c.boundary.len()).sum();
    println!(
        "Average sides per cell: {:.2}",
        total_sides as f64 / mesh.cells().len().max(1) as f64
    );

    if let (Some(center), Some((min, max))) = (lattice.center(), lattice.bounds()) {
        println!("Center: ({:.2}, {:.2})", center.x, center.y);
        println!("Bounds: ({:.2}, {:.2}) .. ({:.2}, {:.2})", min.x, min.y, max.x, max.y);
    }
    println!();

    println!("Sample cells:");
    for (id, edges) in mesh.cell_map().iter().take(5) {
        println!("  Cell {:>4}: {:?}", id, edges);
    }

    println!("\nGeneration complete!");
}
