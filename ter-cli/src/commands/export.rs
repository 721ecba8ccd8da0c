use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::load_terrain;

pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    let (header, alts, _) = load_terrain(&input, true)?;

    let file = File::create(&output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer.write_record(["x", "y", "altitude"])?;

    let width = header.points_x as usize;
    for (i, alt) in alts.iter().enumerate() {
        // Horizontal positions in metres from the first point
        let x = (i % width) as f32 * header.scale_m[0];
        let y = (i / width) as f32 * header.scale_m[1];
        writer.write_record([x.to_string(), y.to_string(), format!("{:.3}", alt)])?;
    }
    writer.flush()?;

    println!("Wrote {} points to {}", alts.len(), output.display());
    Ok(())
}
