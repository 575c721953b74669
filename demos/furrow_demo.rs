//! Example: Compare tissue tension patterns
//!
//! Applies each tissue archetype to the same lattice and prints how the
//! membrane tensions are distributed, then writes a furrowed script.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tissue_lattice::*;

fn summary(name: &str, densities: &Densities) {
    let values: Vec<f64> = densities.values().copied().collect();
    let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!("  {:<18} mean={:.3} min={:.3} max={:.3}", name, mean, min, max);
}

fn main() -> Result<()> {
    let config = LatticeConfigBuilder::new()
        .seed(2024)
        .cells(20, 20)
        .build()?;
    let lattice = Lattice::generate(config)?;
    let mesh = lattice.mesh();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let base = NormalDensities::new(1.0, 0.1).sample(mesh, &mut rng)?;
    let volumes = VolumeSampler::new(vec![500.0, 800.0], vec![50.0, 50.0], Some(vec![0.7, 0.3]))?
        .sample(mesh, &mut rng)?;

    let patterns = [
        (
            "normal furrow (x)",
            TissuePattern::NormalFurrow {
                axis: Axis::X,
                mean: 1.0,
                std_dev: 40.0,
            },
        ),
        ("circular furrow", TissuePattern::CircularFurrow { std_dev: 80.0 }),
        (
            "random cell types",
            TissuePattern::RandomCellTypes {
                tensions: vec![0.5, 1.0, 2.0],
                relative_std: 0.05,
            },
        ),
    ];

    println!("Tension patterns on {} membranes:", mesh.edges().len());
    summary("base", &base);

    let mut furrow = None;
    for (name, pattern) in &patterns {
        let densities = pattern.apply(mesh, &base, &mut rng)?;
        summary(name, &densities);
        furrow.get_or_insert(densities);
    }

    let mut script = EvolverScript::new(mesh, &base, &volumes, true)?;
    script.initial_relaxing(2500, 100).save_one_step("out", "before");
    if let Some(furrow) = &furrow {
        script.change_line_tensions(furrow);
    }
    script.evolve_relaxing(10, 1000, 0.1).save_one_step("out", "after");
    script.save("furrow.fe")?;
    println!("\nWrote furrow.fe");

    Ok(())
}
