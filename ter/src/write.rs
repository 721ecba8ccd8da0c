//! Encoding of Terragen `.ter` files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::byteorder::{write_f32_le, write_u16_le};
use crate::error::{Result, TerError};
use crate::format::{Tag, MAGIC};
use crate::grid::{AltRange, Altitudes, TerHeader};
use crate::quantize::QuantParams;

fn write_tag<W: Write>(out: &mut W, tag: Tag) -> Result<()> {
    out.write_all(tag.as_bytes())?;
    Ok(())
}

fn write_padded<W: Write>(out: &mut W, tag: Tag, val: u16) -> Result<()> {
    write_tag(out, tag)?;
    write_u16_le(out, val)?;
    write_u16_le(out, 0)?;
    Ok(())
}

/// Encode a grid as a terrain file.
///
/// Writes the magic, the `SIZE`, `XPTS`, `YPTS`, `SCAL`, `CRAD` and `CRVM`
/// chunks from `header`, then an `ALTW` chunk whose base and scale are chosen
/// from the true altitude range of `source` (after the write multiplier), one
/// quantized sample per grid point in row-major order, a zero pad sample if
/// the point count is odd, and `EOF `.
///
/// Quantization is lossy: a sample reads back within [`QuantParams::step`] of
/// the written value, and values outside the chosen range saturate.
///
/// # Errors
///
/// - [`TerError::EmptyGrid`] or [`TerError::DimensionsTooLarge`] if the header
///   cannot be represented
/// - [`TerError::InvalidStride`] or [`TerError::BufferTooSmall`] if `source`
///   does not cover the grid
/// - [`TerError::Io`] if writing fails
pub fn encode_ter<W: Write, B: AsRef<[f32]>>(
    out: &mut W,
    header: &TerHeader,
    source: &Altitudes<B>,
) -> Result<QuantParams> {
    header.check_writable()?;
    let points = header.point_count();

    // All-NaN grids fall back to a flat range at 0
    let range =
        AltRange::from_values(source.file_units(points)?).unwrap_or(AltRange::new(0.0, 0.0));
    let params = QuantParams::for_range(range);
    debug!(
        min = range.min,
        max = range.max,
        scale = params.scale,
        base = params.base,
        "quantization parameters"
    );

    out.write_all(MAGIC)?;

    // Both dimensions fit in u16 after check_writable
    let points_x = header.points_x as u16;
    let points_y = header.points_y as u16;
    write_padded(out, Tag::Size, points_x.min(points_y) - 1)?;
    write_padded(out, Tag::Xpts, points_x)?;
    write_padded(out, Tag::Ypts, points_y)?;

    write_tag(out, Tag::Scal)?;
    for axis in header.scale_m {
        write_f32_le(out, axis)?;
    }

    write_tag(out, Tag::Crad)?;
    write_f32_le(out, header.planet_radius_km)?;

    let curve_mode = header.curve_mode.min(u16::MAX as u32) as u16;
    write_padded(out, Tag::Crvm, curve_mode)?;

    write_tag(out, Tag::Altw)?;
    write_u16_le(out, params.scale as u16)?;
    write_u16_le(out, params.base as u16)?;
    for alt in source.file_units(points)? {
        write_u16_le(out, params.quantize(alt) as u16)?;
    }
    if points % 2 == 1 {
        write_u16_le(out, 0)?;
    }

    write_tag(out, Tag::Eof)?;
    Ok(params)
}

/// Write a grid to a terrain file. See [`encode_ter`].
///
/// On failure a partially written file is left on disk.
pub fn write_ter_file<P: AsRef<Path>, B: AsRef<[f32]>>(
    path: P,
    header: &TerHeader,
    source: &Altitudes<B>,
) -> Result<QuantParams> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing terrain file");

    let file = File::create(path).map_err(|e| TerError::Create(e).in_file(path))?;
    let mut out = BufWriter::new(file);
    let params = encode_ter(&mut out, header, source).map_err(|e| e.in_file(path))?;
    out.flush().map_err(|e| TerError::Io(e).in_file(path))?;
    Ok(params)
}
