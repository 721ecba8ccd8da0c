use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use ter::{read_ter_file, AltRange, Altitudes, ReadMode, TerHeader};

use super::load_terrain;

#[derive(Serialize)]
struct InfoResponse {
    file: String,
    header: TerHeader,
    file_size: u64,
    /// base ± scale / 2 from the ALTW chunk, in metres
    estimated_range: AltRange,
    /// Scanned from the samples, in metres
    #[serde(skip_serializing_if = "Option::is_none")]
    exact_range: Option<AltRange>,
}

pub fn run(file: PathBuf, exact: bool, json: bool) -> Result<()> {
    let mut header = TerHeader::default();
    let mut estimated_range = AltRange::new(0.0, 0.0);

    // The descriptor only supplies the read multiplier in metadata mode
    let mut no_samples: [f32; 0] = [];
    let mut dest = Altitudes::new(&mut no_samples[..], 1, 1.0, 1.0);
    read_ter_file(
        &file,
        ReadMode::MetadataOnly,
        &mut header,
        Some(&mut dest),
        Some(&mut estimated_range),
    )
    .context("Failed to read terrain file")?;

    // Metadata is in file units until the Z spacing is known
    let z = header.scale_m[2];
    estimated_range = AltRange::new(estimated_range.min * z, estimated_range.max * z);

    let exact_range = if exact && !header.is_empty() {
        let (_, _, range) = load_terrain(&file, true)?;
        Some(range)
    } else {
        None
    };

    let file_size = std::fs::metadata(&file)?.len();

    if json {
        let response = InfoResponse {
            file: file.display().to_string(),
            header,
            file_size,
            estimated_range,
            exact_range,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("File size: {}", format_size(file_size));
    println!();
    if header.is_empty() {
        println!("Points: none (no dimensions in file)");
    } else {
        println!("Points: {}x{}", header.points_x, header.points_y);
    }
    println!(
        "Spacing: {} x {} x {} m",
        header.scale_m[0], header.scale_m[1], header.scale_m[2]
    );
    println!(
        "Planet: radius {} km, curvature mode {}",
        header.planet_radius_km, header.curve_mode
    );
    println!();
    println!(
        "Estimated range: {:.2}m to {:.2}m",
        estimated_range.min, estimated_range.max
    );
    if let Some(range) = exact_range {
        println!("Min elevation: {:.2}m", range.min);
        println!("Max elevation: {:.2}m", range.max);
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
