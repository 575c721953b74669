//! Surface Evolver script generation
//!
//! An [`EvolverScript`] starts with the mesh definition (vertices, edges,
//! faces, bodies) and accumulates simulation commands after it. Each command
//! method appends one line and returns `&mut Self` so calls can be chained.

mod runner;

pub use runner::run_evolver;

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use crate::error::{LatticeError, Result};
use crate::geometry::Precision;
use crate::mesh::Mesh;
use crate::tension::{Densities, Volumes};

/// Decimals kept for coordinates and initial densities in the script
const SCRIPT_PRECISION: Precision = Precision::new(3);

/// Refinements applied after `read` when edges may curve
const CURVED_REFINEMENT: u32 = 3;

/// A Surface Evolver input file under construction
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tissue_lattice::*;
///
/// let config = LatticeConfigBuilder::new().seed(3).cells(5, 5).build().unwrap();
/// let lattice = Lattice::generate(config).unwrap();
/// let mesh = lattice.mesh();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(3);
/// let densities = NormalDensities::default().sample(mesh, &mut rng).unwrap();
/// let volumes = VolumeSampler::default().sample(mesh, &mut rng).unwrap();
///
/// let mut script = EvolverScript::new(mesh, &densities, &volumes, true).unwrap();
/// script.initial_relaxing(2500, 100).evolve_relaxing(10, 100, 0.1);
///
/// let text = script.finish();
/// assert!(text.starts_with("SPACE_DIMENSION 2"));
/// assert!(text.ends_with("q; \n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvolverScript {
    text: String,
}

impl EvolverScript {
    /// Write the mesh definition and the `read` preamble
    ///
    /// Every edge needs a density and every cell a volume. Densities are
    /// rounded to three decimals. Unless `polygonal`, the edges are refined
    /// so the simulator can curve them.
    ///
    /// # Errors
    ///
    /// Returns `MissingValue` for the first edge or cell without a value.
    pub fn new(
        mesh: &Mesh,
        densities: &Densities,
        volumes: &Volumes,
        polygonal: bool,
    ) -> Result<Self> {
        let mut script = Self::default();
        script.write_geometry(mesh, densities, volumes)?;
        script.write_read_section();

        if !polygonal {
            script.refine(CURVED_REFINEMENT);
        }

        log::debug!(
            "evolver header: {} vertices, {} edges, {} bodies",
            mesh.vertices().len(),
            mesh.edges().len(),
            mesh.cells().len()
        );
        Ok(script)
    }

    fn write_geometry(
        &mut self,
        mesh: &Mesh,
        densities: &Densities,
        volumes: &Volumes,
    ) -> Result<()> {
        self.text.push_str("SPACE_DIMENSION 2 \n");
        self.text.push_str("SCALE 0.005 FIXED\n");
        self.text.push_str("STRING \n");
        self.text.push('\n');

        self.text.push_str("vertices \n");
        for vertex in mesh.vertices() {
            let p = SCRIPT_PRECISION.round_point(vertex.position);
            self.line(format_args!("{}   {:?} {:?}", vertex.id, p.x, p.y));
        }
        self.text.push('\n');

        self.text.push_str("edges \n");
        for edge in mesh.edges() {
            let density = densities
                .get(&edge.id)
                .ok_or(LatticeError::MissingValue {
                    kind: "density",
                    id: edge.id.0 as i64,
                })?;
            self.line(format_args!(
                "{}   {}   {}   density {:?}",
                edge.id,
                edge.start,
                edge.end,
                SCRIPT_PRECISION.round(*density)
            ));
        }
        self.text.push('\n');

        self.text.push_str("faces \n");
        for cell in mesh.cells() {
            let boundary: Vec<String> = cell
                .boundary
                .iter()
                .map(|e| e.to_signed().to_string())
                .collect();
            self.line(format_args!("{}   {} ", cell.id.index, boundary.join(" ")));
        }
        self.text.push('\n');

        self.text.push_str("bodies \n");
        for cell in mesh.cells() {
            let id = cell.id.to_signed();
            let volume = volumes.get(&id).ok_or(LatticeError::MissingValue {
                kind: "volume",
                id,
            })?;
            self.line(format_args!("{}   {}    VOLUME {} ", cell.id.index, id, volume));
        }

        Ok(())
    }

    fn write_read_section(&mut self) {
        self.text.push_str("\n \n");
        self.text.push_str("read \n \n");
        self.text.push_str("show_all_edges off \n");
        self.text.push_str("metric_conversion off \n");
        self.text.push_str("autorecalc on \n");
        self.text.push_str("gv_binary off \n");
        self.text.push_str("gravity off \n");
        self.text.push_str("ii := 0; \n");
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        // Formatting into a String cannot fail
        let _ = self.text.write_fmt(args);
        self.text.push('\n');
    }

    /// Script text so far
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Average vertex positions `times` times (`V`)
    pub fn vertex_averaging(&mut self, times: u32) -> &mut Self {
        self.line(format_args!("V {}; ", times));
        self
    }

    /// Refine the edge triangulation `times` times (`r`)
    pub fn refine(&mut self, times: u32) -> &mut Self {
        self.line(format_args!("r {}; ", times));
        self
    }

    /// Set the gradient descent scale factor
    pub fn change_scale(&mut self, scale: f64) -> &mut Self {
        self.line(format_args!("scale := {:?}; ", scale));
        self
    }

    /// Run `steps` iterations (`g`)
    pub fn evolve(&mut self, steps: u32) -> &mut Self {
        self.line(format_args!("g {}; ", steps));
        self
    }

    /// Swap neighbours across every edge shorter than `max_length`
    pub fn t1_swaps(&mut self, max_length: f64) -> &mut Self {
        self.line(format_args!("t1_edgeswap edge where length < {:?}; ", max_length));
        self
    }

    /// Settle a fresh lattice at decreasing scales
    ///
    /// Averages, evolves at scale 0.25, averages, evolves at 0.1, averages,
    /// and leaves the scale at 0.01.
    pub fn initial_relaxing(&mut self, steps: u32, averaging: u32) -> &mut Self {
        self.vertex_averaging(averaging)
            .change_scale(0.25)
            .evolve(steps)
            .vertex_averaging(averaging)
            .change_scale(0.1)
            .evolve(steps)
            .vertex_averaging(averaging)
            .change_scale(0.01)
    }

    /// Alternate `steps` iterations with a T1 pass, `times` times
    pub fn evolve_relaxing(&mut self, times: u32, steps: u32, max_length: f64) -> &mut Self {
        for _ in 0..times {
            self.evolve(steps).t1_swaps(max_length);
        }
        self
    }

    /// Dump the current state to `{directory}/{name}{ii}.dmp` and bump `ii`
    pub fn save_one_step(&mut self, directory: &str, name: &str) -> &mut Self {
        self.line(format_args!(
            "ff := sprintf \"{}/{}%d.dmp\",ii; dump ff; ii+=1; ",
            directory, name
        ));
        self
    }

    /// Evolve in a loop, dumping after every round until `ii` reaches `max_steps`
    pub fn save_many_steps(
        &mut self,
        directory: &str,
        name: &str,
        max_steps: u32,
        time_step: u32,
        averaging: u32,
        max_length: f64,
    ) -> &mut Self {
        self.line(format_args!(
            "while ii < {} do {{ g {}; V {}; t1_edgeswap edge where length < {:?}; \
             ff := sprintf \"{}/{}%d.dmp\",ii; dump ff; ii:=ii+1}} ",
            max_steps, time_step, averaging, max_length, directory, name
        ));
        self
    }

    /// Overwrite edge densities, one `set edges` command per entry
    pub fn change_line_tensions(&mut self, densities: &Densities) -> &mut Self {
        for (id, density) in densities {
            self.line(format_args!(
                "set edges density {:?} where original == {}; ",
                density, id
            ));
        }
        self
    }

    /// Append the quit command and return the full script
    pub fn finish(mut self) -> String {
        self.text.push_str("q; \n");
        self.text
    }

    /// Finish the script and write it to `path`
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut text = self.finish();
        text.push('\n');
        fs::write(path, text)?;
        log::info!("wrote evolver script to {}", path.display());
        Ok(())
    }
}
