//! Raw 16-bit heightmaps.
//!
//! A raw heightmap is just `points_x * points_y` unsigned 16-bit samples in
//! row-major order, little-endian unless asked otherwise. The grid's own
//! altitude range is stretched over `0..=65535`; nothing else is stored, so
//! the dimensions and the [`AltRange`] returned by the writer must be kept
//! elsewhere to read the data back. The format is more widely supported than
//! `.ter` but cannot preserve scale on its own.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::byteorder::ByteOrder;
use crate::error::{Result, TerError};
use crate::grid::{AltRange, Altitudes, TerHeader};
use crate::quantize::RawScaling;

/// Encode a grid as a raw heightmap.
///
/// Returns the altitude range (in file units, after the write multiplier) that
/// was mapped onto `0..=65535`.
pub fn encode_raw<W: Write, B: AsRef<[f32]>>(
    out: &mut W,
    header: &TerHeader,
    source: &Altitudes<B>,
    order: ByteOrder,
) -> Result<AltRange> {
    let points = header.point_count();
    if points == 0 {
        return Err(TerError::EmptyGrid {
            points_x: header.points_x,
            points_y: header.points_y,
        });
    }

    let range =
        AltRange::from_values(source.file_units(points)?).unwrap_or(AltRange::new(0.0, 0.0));
    let scaling = RawScaling::for_range(range);
    debug!(min = range.min, max = range.max, ?order, "raw scaling");

    for alt in source.file_units(points)? {
        order.write_u16(out, scaling.encode(alt))?;
    }
    Ok(range)
}

/// Decode a raw heightmap written with the given range.
///
/// Samples are mapped back into file units with `range` and then multiplied by
/// the destination's read multiplier. Extra trailing bytes are ignored.
pub fn decode_raw<B: AsMut<[f32]>>(
    data: &[u8],
    header: &TerHeader,
    dest: &mut Altitudes<B>,
    range: AltRange,
    order: ByteOrder,
) -> Result<()> {
    let points = header.point_count();
    let needed = points * 2;
    if data.len() < needed {
        return Err(TerError::TruncatedData {
            context: "raw samples".to_string(),
            offset: data.len() as u64,
        });
    }

    let scaling = RawScaling::for_range(range);
    let mult = dest.read_multiplier;
    let mut cursor = Cursor::new(&data[..needed]);
    for slot in dest.slots_mut(points)? {
        let raw = order.read_u16(&mut cursor)?;
        *slot = scaling.decode(raw) * mult;
    }
    Ok(())
}

/// Write a little-endian raw heightmap. See [`encode_raw`].
pub fn write_raw_file<P: AsRef<Path>, B: AsRef<[f32]>>(
    path: P,
    header: &TerHeader,
    source: &Altitudes<B>,
) -> Result<AltRange> {
    write_raw_file_with(path, header, source, ByteOrder::Intel)
}

/// Write a raw heightmap in the given byte order.
///
/// On failure a partially written file is left on disk.
pub fn write_raw_file_with<P: AsRef<Path>, B: AsRef<[f32]>>(
    path: P,
    header: &TerHeader,
    source: &Altitudes<B>,
    order: ByteOrder,
) -> Result<AltRange> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing raw heightmap");

    let file = File::create(path).map_err(|e| TerError::Create(e).in_file(path))?;
    let mut out = BufWriter::new(file);
    let range = encode_raw(&mut out, header, source, order).map_err(|e| e.in_file(path))?;
    out.flush().map_err(|e| TerError::Io(e).in_file(path))?;
    Ok(range)
}

/// Read a raw heightmap from disk. See [`decode_raw`].
pub fn read_raw_file<P: AsRef<Path>, B: AsMut<[f32]>>(
    path: P,
    header: &TerHeader,
    dest: &mut Altitudes<B>,
    range: AltRange,
    order: ByteOrder,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TerError::Open(e).in_file(path))?;

    // SAFETY: See read_ter_file; the mapping is read-only and short-lived.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TerError::Open(e).in_file(path))?;

    decode_raw(&mmap, header, dest, range, order).map_err(|e| e.in_file(path))
}
