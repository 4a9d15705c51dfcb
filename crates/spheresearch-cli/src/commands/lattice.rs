use crate::cli::LatticeArgs;
use crate::config::PartialSearchConfig;
use crate::error::{CliError, Result};
use spheresearch::core::lattice::Lattice;
use std::io::Write;
use tracing::info;

pub async fn run(args: LatticeArgs) -> Result<()> {
    let partial_config = PartialSearchConfig::from_optional_file(args.config.as_deref())?;
    let dims = partial_config.merge_lattice(&args.lattice);

    let lattice = Lattice::generate(dims.radius, dims.slices, dims.stacks)
        .map_err(|e| CliError::Config(e.to_string()))?;
    info!(
        size = lattice.len(),
        slices = lattice.slices(),
        stacks = lattice.stacks(),
        "Lattice generated."
    );

    let stdout = std::io::stdout();
    write_lattice(&lattice, &mut stdout.lock())?;
    Ok(())
}

/// Writes `index\tx\ty\tz`, one lattice point per line.
fn write_lattice<W: Write>(lattice: &Lattice, out: &mut W) -> std::io::Result<()> {
    for (index, point) in lattice.points().iter().enumerate() {
        writeln!(out, "{}\t{}\t{}\t{}", index, point.x, point.y, point.z)?;
    }
    out.flush()
}
