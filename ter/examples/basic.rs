//! Basic example: print a terrain file's metadata and altitude range.
//!
//! Run with: cargo run --example basic -- /path/to/file.ter

use std::env;
use ter::{read_ter_file, AltRange, Altitudes, ReadMode, TerError, TerHeader};

fn main() -> Result<(), TerError> {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/file.ter");
        std::process::exit(1);
    });

    // First pass: dimensions and scale
    let mut header = TerHeader::default();
    read_ter_file(&path, ReadMode::MetadataOnly, &mut header, None, None)?;

    println!("{}", path);
    println!("{:-<50}", "");
    println!("Points:  {} x {}", header.points_x, header.points_y);
    println!(
        "Spacing: {} x {} x {} m",
        header.scale_m[0], header.scale_m[1], header.scale_m[2]
    );

    if header.is_empty() {
        println!("No dimensions in file");
        return Ok(());
    }

    // Second pass: elevations in metres
    let mut alts = vec![0.0f32; header.point_count()];
    let mut range = AltRange::new(0.0, 0.0);
    let mut dest = Altitudes::metres(&mut alts[..], &header);
    read_ter_file(
        &path,
        ReadMode::FullDecode,
        &mut header,
        Some(&mut dest),
        Some(&mut range),
    )?;

    println!("Min:     {:.2} m", range.min);
    println!("Max:     {:.2} m", range.max);

    Ok(())
}
