use anyhow::Result;
use std::path::PathBuf;

use super::{load_terrain, save_terrain};
use crate::Format;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    format: Format,
    big_endian: bool,
    metres: bool,
) -> Result<()> {
    let (header, alts, range) = load_terrain(&input, metres)?;
    save_terrain(&output, &header, &alts, format, big_endian, metres)?;

    println!(
        "{} -> {} ({}x{}, {:.2} to {:.2})",
        input.display(),
        output.display(),
        header.points_x,
        header.points_y,
        range.min,
        range.max
    );
    Ok(())
}
