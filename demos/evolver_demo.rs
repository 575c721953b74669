//! Example: Write a Surface Evolver script for a relaxed tissue
//!
//! Usage: cargo run --example evolver_demo [output.fe] [evolver-binary]
//!
//! When an evolver binary is given, the script is run through it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tissue_lattice::*;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "tissue.fe".to_string());
    let binary = args.next();

    let config = LatticeConfigBuilder::new()
        .seed(7)
        .cells(15, 15)
        .build()?;
    let lattice = Lattice::generate(config)?;
    let mesh = lattice.mesh();
    println!("Lattice: {} cells, {} edges", mesh.cells().len(), mesh.edges().len());

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let densities = NormalDensities::new(1.0, 0.1).sample(mesh, &mut rng)?;
    let volumes = VolumeSampler::normal(600.0, 60.0).sample(mesh, &mut rng)?;

    let mut script = EvolverScript::new(mesh, &densities, &volumes, false)?;
    script
        .initial_relaxing(10_000, 100)
        .evolve_relaxing(10, 2500, 0.1)
        .vertex_averaging(100)
        .change_scale(0.005)
        .evolve_relaxing(5, 5000, 0.1)
        .save_one_step("out", "relaxed")
        .save_many_steps("out", "relaxed", 50, 50, 1, 0.1);

    script.save(&output)?;
    println!("Wrote {}", output);

    if let Some(binary) = binary {
        let ok = run_evolver(&output, &binary)?;
        println!("Evolver {}", if ok { "succeeded" } else { "failed" });
    }

    Ok(())
}
