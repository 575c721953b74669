//! Launching the Surface Evolver binary

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::Result;

/// Run a saved script through the simulator
///
/// The simulator's stdout is discarded; stderr is inherited. Returns whether
/// the process exited successfully.
///
/// # Errors
///
/// Returns `Io` if the binary cannot be started.
pub fn run_evolver<P, B>(script_path: P, evolver_binary: B) -> Result<bool>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let script_path = script_path.as_ref();
    let evolver_binary = evolver_binary.as_ref();
    let start = Instant::now();

    log::info!(
        "running {} on {}",
        evolver_binary.display(),
        script_path.display()
    );

    let status = Command::new(evolver_binary)
        .arg(script_path)
        .stdout(Stdio::null())
        .status()?;

    if status.success() {
        log::info!("evolver finished in {:?}", start.elapsed());
    } else {
        log::warn!("evolver exited with {}", status);
    }

    Ok(status.success())
}
