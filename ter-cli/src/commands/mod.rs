pub mod batch;
pub mod convert;
pub mod export;
pub mod info;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use ter::{
    read_ter_file, write_raw_file_with, write_ter_file, AltRange, Altitudes, ByteOrder, ReadMode,
    TerHeader,
};

use crate::Format;

/// Metadata written next to a raw heightmap; the raw file has none of its own.
#[derive(Serialize)]
struct RawSidecar {
    header: TerHeader,
    range: AltRange,
    byte_order: &'static str,
}

/// Read a whole terrain file, in metres or in file units.
pub fn load_terrain(path: &Path, metres: bool) -> Result<(TerHeader, Vec<f32>, AltRange)> {
    let mut header = TerHeader::default();
    read_ter_file(path, ReadMode::MetadataOnly, &mut header, None, None)
        .context("Failed to read terrain header")?;

    if header.is_empty() {
        bail!("{} has no grid dimensions", path.display());
    }

    let mut alts = vec![0.0f32; header.point_count()];
    let mut range = AltRange::new(0.0, 0.0);
    let mut dest = if metres {
        Altitudes::metres(&mut alts[..], &header)
    } else {
        Altitudes::packed(&mut alts[..])
    };
    read_ter_file(
        path,
        ReadMode::FullDecode,
        &mut header,
        Some(&mut dest),
        Some(&mut range),
    )
    .context("Failed to read elevations")?;

    Ok((header, alts, range))
}

/// Write a grid in the requested format. Raw output also gets a `.json` sidecar.
pub fn save_terrain(
    path: &Path,
    header: &TerHeader,
    alts: &[f32],
    format: Format,
    big_endian: bool,
    metres: bool,
) -> Result<()> {
    let source = if metres {
        Altitudes::metres(alts, header)
    } else {
        Altitudes::packed(alts)
    };

    match format {
        Format::Ter => {
            let params = write_ter_file(path, header, &source).context("Failed to write terrain")?;
            tracing::info!(scale = params.scale, base = params.base, "wrote {}", path.display());
        }
        Format::Raw => {
            let order = if big_endian {
                ByteOrder::Motorola
            } else {
                ByteOrder::Intel
            };
            let range = write_raw_file_with(path, header, &source, order)
                .context("Failed to write raw heightmap")?;

            let sidecar = RawSidecar {
                header: *header,
                range,
                byte_order: if big_endian { "big" } else { "little" },
            };
            let sidecar_path = path.with_extension("json");
            let file = File::create(&sidecar_path).with_context(|| {
                format!("Failed to create sidecar {}", sidecar_path.display())
            })?;
            serde_json::to_writer_pretty(BufWriter::new(file), &sidecar)?;
        }
    }

    Ok(())
}
