//! Decoding of Terragen `.ter` files.
//!
//! Reading is normally done in two passes. A [`ReadMode::MetadataOnly`] pass
//! fills in the header dimensions and scale; the caller then allocates a buffer
//! of `points_x * points_y` samples and runs a [`ReadMode::FullDecode`] pass to
//! fill it.
//!
//! ```ignore
//! use ter::{read_ter_file, Altitudes, ReadMode, TerHeader};
//!
//! let mut header = TerHeader::default();
//! read_ter_file("valley.ter", ReadMode::MetadataOnly, &mut header, None, None)?;
//!
//! let mut alts = vec![0.0f32; header.point_count()];
//! let mut dest = Altitudes::packed(&mut alts[..]);
//! read_ter_file("valley.ter", ReadMode::FullDecode, &mut header, Some(&mut dest), None)?;
//! ```

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, trace};

use crate::byteorder::{read_f32_le, read_u16_le};
use crate::error::{Result, TerError};
use crate::format::{Tag, DEFAULT_CURVE_MODE, DEFAULT_PLANET_RADIUS_KM, DEFAULT_SCALE_M, MAGIC};
use crate::grid::{AltRange, Altitudes, TerHeader};
use crate::quantize::QuantParams;

/// What a read should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Dimensions and scale metadata only; samples are not touched.
    ///
    /// If both a destination and a range output are supplied, the range is
    /// *estimated* as `base ± scale / 2` (times the read multiplier) without
    /// looking at any sample. It is not guaranteed to contain the true range.
    MetadataOnly,
    /// Fill the destination buffer, sized from the header's current dimensions.
    ///
    /// The header's dimensions are not updated. A range output receives the
    /// true min/max of the decoded samples.
    FullDecode,
}

/// Cursor over the chunk stream that reports short reads as truncation.
struct ChunkReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ChunkReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn offset(&self) -> u64 {
        self.cursor.position()
    }

    fn truncated(&self, context: &str) -> TerError {
        TerError::TruncatedData {
            context: context.to_string(),
            offset: self.offset(),
        }
    }

    fn tag(&mut self) -> Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.cursor.read_exact(&mut buf).map_err(|_| self.truncated("tag"))?;
        Ok(buf)
    }

    fn u16(&mut self, tag: Tag) -> Result<u16> {
        read_u16_le(&mut self.cursor).map_err(|_| self.truncated(tag.as_str()))
    }

    /// A signed value, stored as the bit pattern of a `u16`.
    fn i16(&mut self, tag: Tag) -> Result<i16> {
        self.u16(tag).map(|v| v as i16)
    }

    fn f32(&mut self, tag: Tag) -> Result<f32> {
        read_f32_le(&mut self.cursor).map_err(|_| self.truncated(tag.as_str()))
    }

    /// A u16 followed by two bytes of padding.
    fn padded_u16(&mut self, tag: Tag) -> Result<u16> {
        let val = self.u16(tag)?;
        self.u16(tag)?;
        Ok(val)
    }
}

/// Decode a terrain file held in memory.
///
/// The header is only modified once the whole chunk stream has been parsed, so
/// on error it is left as it was. In full-decode mode the destination may have
/// been partially written.
///
/// # Errors
///
/// - [`TerError::NotTerrain`] if the magic does not match
/// - [`TerError::UnknownTag`] for a tag outside the known set
/// - [`TerError::TruncatedData`] if the data ends mid-chunk
/// - [`TerError::MissingBuffer`], [`TerError::BufferTooSmall`],
///   [`TerError::InvalidStride`] or [`TerError::MissingElevations`] for a full
///   decode that cannot be satisfied
pub fn decode_ter(
    data: &[u8],
    mode: ReadMode,
    header: &mut TerHeader,
    mut dest: Option<&mut Altitudes<&mut [f32]>>,
    range: Option<&mut AltRange>,
) -> Result<()> {
    if !data.starts_with(MAGIC) {
        return Err(TerError::NotTerrain);
    }
    if mode == ReadMode::FullDecode && dest.is_none() {
        return Err(TerError::MissingBuffer);
    }

    let mut reader = ChunkReader::new(data);
    reader.cursor.set_position(MAGIC.len() as u64);

    let mut points_x: Option<u32> = None;
    let mut points_y: Option<u32> = None;
    let mut scale_m = DEFAULT_SCALE_M;
    let mut planet_radius_km = DEFAULT_PLANET_RADIUS_KM;
    let mut curve_mode = DEFAULT_CURVE_MODE;
    let mut quant: Option<QuantParams> = None;

    loop {
        let offset = reader.offset();
        let bytes = reader.tag()?;
        let tag = Tag::from_bytes(bytes).ok_or_else(|| TerError::UnknownTag {
            tag: String::from_utf8_lossy(&bytes).into_owned(),
            offset,
        })?;
        trace!(tag = tag.as_str(), offset, "chunk");

        match tag {
            Tag::Size => {
                // Only fills axes that no XPTS/YPTS has set yet
                let points = reader.padded_u16(tag)? as u32 + 1;
                points_x.get_or_insert(points);
                points_y.get_or_insert(points);
            }
            Tag::Xpts => points_x = Some(reader.padded_u16(tag)? as u32),
            Tag::Ypts => points_y = Some(reader.padded_u16(tag)? as u32),
            Tag::Scal => {
                for axis in scale_m.iter_mut() {
                    *axis = reader.f32(tag)?;
                }
            }
            Tag::Crad => planet_radius_km = reader.f32(tag)?,
            Tag::Crvm => curve_mode = reader.padded_u16(tag)? as u32,
            Tag::Altw => {
                let scale = reader.i16(tag)?;
                let base = reader.i16(tag)?;
                let params = QuantParams::new(scale, base);
                debug!(scale, base, "altitude chunk");

                if mode == ReadMode::FullDecode {
                    let dest = dest.as_deref_mut().ok_or(TerError::MissingBuffer)?;
                    let mult = dest.read_multiplier;
                    for slot in dest.slots_mut(header.point_count())? {
                        *slot = params.dequantize(reader.i16(tag)?) * mult;
                    }
                }

                quant = Some(params);
                break;
            }
            Tag::Eof => break,
        }
    }

    if mode == ReadMode::FullDecode && quant.is_none() {
        return Err(TerError::MissingElevations);
    }

    match mode {
        ReadMode::MetadataOnly => {
            header.points_x = points_x.unwrap_or(0);
            header.points_y = points_y.unwrap_or(0);
            if let (Some(range), Some(dest)) = (range, dest.as_deref()) {
                let estimate = quant.unwrap_or(QuantParams::new(0, 0)).estimated_range();
                let mult = dest.read_multiplier;
                *range = AltRange::new(estimate.min * mult, estimate.max * mult);
            }
        }
        ReadMode::FullDecode => {
            if let (Some(range), Some(dest)) = (range, dest.as_deref()) {
                if let Some(scanned) = AltRange::scan(header, dest)? {
                    *range = scanned;
                }
            }
        }
    }

    header.scale_m = scale_m;
    header.planet_radius_km = planet_radius_km;
    header.curve_mode = curve_mode;

    Ok(())
}

/// Read a terrain file from disk. See [`decode_ter`].
///
/// Errors are attributed to `path` via [`TerError::File`].
pub fn read_ter_file<P: AsRef<Path>>(
    path: P,
    mode: ReadMode,
    header: &mut TerHeader,
    dest: Option<&mut Altitudes<&mut [f32]>>,
    range: Option<&mut AltRange>,
) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?mode, "reading terrain file");

    let file = File::open(path).map_err(|e| TerError::Open(e).in_file(path))?;

    // SAFETY: Memory mapping is safe as long as the file is not modified
    // while mapped. We open the file read-only and drop the mapping on return.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TerError::Open(e).in_file(path))?;

    decode_ter(&mmap, mode, header, dest, range).map_err(|e| e.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byteorder::{write_f32_le, write_u16_le};

    /// Builds chunk streams by hand.
    struct TerBuilder {
        bytes: Vec<u8>,
    }

    impl TerBuilder {
        fn new() -> Self {
            Self {
                bytes: MAGIC.to_vec(),
            }
        }

        fn tag(mut self, tag: &[u8; 4]) -> Self {
            self.bytes.extend_from_slice(tag);
            self
        }

        fn padded(mut self, tag: &[u8; 4], val: u16) -> Self {
            self.bytes.extend_from_slice(tag);
            write_u16_le(&mut self.bytes, val).unwrap();
            write_u16_le(&mut self.bytes, 0).unwrap();
            self
        }

        fn floats(mut self, tag: &[u8; 4], vals: &[f32]) -> Self {
            self.bytes.extend_from_slice(tag);
            for v in vals {
                write_f32_le(&mut self.bytes, *v).unwrap();
            }
            self
        }

        fn altw(mut self, scale: i16, base: i16, samples: &[i16]) -> Self {
            self.bytes.extend_from_slice(b"ALTW");
            write_u16_le(&mut self.bytes, scale as u16).unwrap();
            write_u16_le(&mut self.bytes, base as u16).unwrap();
            for s in samples {
                write_u16_le(&mut self.bytes, *s as u16).unwrap();
            }
            self
        }

        fn build(self) -> Vec<u8> {
            self.bytes
        }
    }

    fn metadata(data: &[u8]) -> Result<TerHeader> {
        let mut header = TerHeader::default();
        decode_ter(data, ReadMode::MetadataOnly, &mut header, None, None)?;
        Ok(header)
    }

    #[test]
    fn test_size_sets_both_axes() {
        let data = TerBuilder::new().padded(b"SIZE", 256).tag(b"EOF ").build();
        let header = metadata(&data).unwrap();
        assert_eq!((header.points_x, header.points_y), (257, 257));
    }

    #[test]
    fn test_xpts_before_size_is_kept() {
        let data = TerBuilder::new()
            .padded(b"XPTS", 100)
            .padded(b"SIZE", 256)
            .tag(b"EOF ")
            .build();
        let header = metadata(&data).unwrap();
        assert_eq!((header.points_x, header.points_y), (100, 257));
    }

    #[test]
    fn test_xpts_after_size_overrides() {
        let data = TerBuilder::new()
            .padded(b"SIZE", 256)
            .padded(b"XPTS", 300)
            .padded(b"YPTS", 200)
            .tag(b"EOF ")
            .build();
        let header = metadata(&data).unwrap();
        assert_eq!((header.points_x, header.points_y), (300, 200));
    }

    #[test]
    fn test_defaults_when_absent() {
        let data = TerBuilder::new().tag(b"EOF ").build();
        let mut header = TerHeader::new(9, 9);
        header.scale_m = [1.0, 2.0, 3.0];
        header.planet_radius_km = 1.0;
        header.curve_mode = 4;
        decode_ter(&data, ReadMode::MetadataOnly, &mut header, None, None).unwrap();
        assert_eq!(header, TerHeader::default());
    }

    #[test]
    fn test_scale_metadata() {
        let data = TerBuilder::new()
            .floats(b"SCAL", &[10.0, 20.0, 5.0])
            .floats(b"CRAD", &[3390.0])
            .padded(b"CRVM", 1)
            .tag(b"EOF ")
            .build();
        let header = metadata(&data).unwrap();
        assert_eq!(header.scale_m, [10.0, 20.0, 5.0]);
        assert_eq!(header.planet_radius_km, 3390.0);
        assert_eq!(header.curve_mode, 1);
    }

    #[test]
    fn test_bad_magic_leaves_header() {
        let mut data = TerBuilder::new().padded(b"SIZE", 4).tag(b"EOF ").build();
        data[0] = b'X';
        let mut header = TerHeader::new(3, 3);
        let before = header;
        let result = decode_ter(&data, ReadMode::MetadataOnly, &mut header, None, None);
        assert!(matches!(result, Err(TerError::NotTerrain)));
        assert_eq!(header, before);

        assert!(matches!(metadata(b"TERRAGEN"), Err(TerError::NotTerrain)));
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        let data = TerBuilder::new()
            .padded(b"SIZE", 4)
            .padded(b"JUNK", 0)
            .tag(b"EOF ")
            .build();
        match metadata(&data) {
            Err(TerError::UnknownTag { tag, offset }) => {
                assert_eq!(tag, "JUNK");
                assert_eq!(offset, 24);
            }
            other => panic!("Expected UnknownTag error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = TerBuilder::new().floats(b"SCAL", &[1.0, 1.0, 1.0]).build();
        data.truncate(data.len() - 2);
        match metadata(&data) {
            Err(TerError::TruncatedData { context, .. }) => assert_eq!(context, "SCAL"),
            other => panic!("Expected TruncatedData error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_terminal_tag_is_truncation() {
        let data = TerBuilder::new().padded(b"SIZE", 4).build();
        assert!(matches!(
            metadata(&data),
            Err(TerError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_full_decode_samples() {
        let data = TerBuilder::new()
            .padded(b"XPTS", 2)
            .padded(b"YPTS", 2)
            .altw(8, 4, &[0, 8192, -8192, -32768])
            .tag(b"EOF ")
            .build();

        let mut header = TerHeader::new(2, 2);
        let mut buf = vec![0.0f32; 4];
        let mut dest = Altitudes::new(&mut buf[..], 1, 2.0, 0.5);
        let mut range = AltRange::new(0.0, 0.0);
        decode_ter(
            &data,
            ReadMode::FullDecode,
            &mut header,
            Some(&mut dest),
            Some(&mut range),
        )
        .unwrap();

        // (4 + raw * 8 / 65536) * 2
        assert_eq!(buf, vec![8.0, 10.0, 6.0, 0.0]);
        assert_eq!(range, AltRange::new(0.0, 10.0));
    }

    #[test]
    fn test_full_decode_uses_header_dimensions() {
        let data = TerBuilder::new()
            .padded(b"SIZE", 99)
            .altw(2, 0, &[100, 200, 300])
            .tag(b"EOF ")
            .build();

        let mut header = TerHeader::new(1, 2);
        let mut buf = vec![-1.0f32; 4];
        let mut dest = Altitudes::new(&mut buf[..], 2, 1.0, 1.0);
        decode_ter(&data, ReadMode::FullDecode, &mut header, Some(&mut dest), None).unwrap();

        assert_eq!((header.points_x, header.points_y), (1, 2));
        assert_eq!(buf[1], -1.0);
        assert_eq!(buf[3], -1.0);
        assert!((buf[0] - 100.0 * 2.0 / 65536.0).abs() < 1e-6);
        assert!((buf[2] - 200.0 * 2.0 / 65536.0).abs() < 1e-6);
    }

    #[test]
    fn test_metadata_estimated_range() {
        let data = TerBuilder::new()
            .padded(b"SIZE", 1)
            .altw(100, 50, &[1, 2, 3, 4])
            .tag(b"EOF ")
            .build();

        let mut header = TerHeader::default();
        let mut empty: [f32; 0] = [];
        let mut dest = Altitudes::new(&mut empty[..], 1, 3.0, 1.0 / 3.0);
        let mut range = AltRange::new(0.0, 0.0);
        decode_ter(
            &data,
            ReadMode::MetadataOnly,
            &mut header,
            Some(&mut dest),
            Some(&mut range),
        )
        .unwrap();

        assert_eq!(range, AltRange::new(0.0, 300.0));
        assert_eq!((header.points_x, header.points_y), (2, 2));
    }

    #[test]
    fn test_metadata_range_needs_descriptor() {
        let data = TerBuilder::new().padded(b"SIZE", 1).altw(100, 50, &[]).build();
        let mut header = TerHeader::default();
        let mut range = AltRange::new(-1.0, -1.0);
        decode_ter(&data, ReadMode::MetadataOnly, &mut header, None, Some(&mut range)).unwrap();
        assert_eq!(range, AltRange::new(-1.0, -1.0));
    }

    #[test]
    fn test_full_decode_without_altw() {
        let data = TerBuilder::new().padded(b"SIZE", 1).tag(b"EOF ").build();
        let mut header = TerHeader::new(2, 2);
        let mut buf = vec![0.0f32; 4];
        let mut dest = Altitudes::packed(&mut buf[..]);
        let result = decode_ter(&data, ReadMode::FullDecode, &mut header, Some(&mut dest), None);
        assert!(matches!(result, Err(TerError::MissingElevations)));
    }

    #[test]
    fn test_full_decode_needs_buffer() {
        let data = TerBuilder::new().altw(1, 0, &[0]).build();
        let mut header = TerHeader::new(1, 1);
        let result = decode_ter(&data, ReadMode::FullDecode, &mut header, None, None);
        assert!(matches!(result, Err(TerError::MissingBuffer)));
    }

    #[test]
    fn test_full_decode_overflowing_stride() {
        let data = TerBuilder::new().altw(8, 0, &[1, 2]).build();
        let mut header = TerHeader::new(2, 1);
        let mut buf = [-1.0f32; 2];
        let mut dest = Altitudes::new(&mut buf[..], usize::MAX, 1.0, 1.0);
        let result = decode_ter(&data, ReadMode::FullDecode, &mut header, Some(&mut dest), None);
        assert!(matches!(result, Err(TerError::BufferTooSmall { .. })));
        assert_eq!(buf, [-1.0, -1.0]);
    }

    #[test]
    fn test_full_decode_truncated_samples() {
        let data = TerBuilder::new().altw(8, 0, &[1, 2, 3]).build();
        let mut header = TerHeader::new(2, 2);
        let mut buf = vec![0.0f32; 4];
        let mut dest = Altitudes::packed(&mut buf[..]);
        let result = decode_ter(&data, ReadMode::FullDecode, &mut header, Some(&mut dest), None);
        assert!(matches!(result, Err(TerError::TruncatedData { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.ter");
        let mut header = TerHeader::default();
        let err = read_ter_file(&path, ReadMode::MetadataOnly, &mut header, None, None)
            .unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(matches!(err.kind(), TerError::Open(_)));
    }
}
