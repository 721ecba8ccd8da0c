//! # TER - Terragen Terrain Codec
//!
//! Reader and writer for Terragen `.ter` heightfield files, plus a plain raw
//! 16-bit heightmap writer.
//!
//! ## Features
//!
//! - **Two-pass reads**: read dimensions and scale first, allocate, then decode
//! - **Caller-owned buffers**: samples are read into and written from your own
//!   slices, with a stride for interleaved storage and unit multipliers
//! - **Faithful quantization**: reproduces the format's 16-bit base/scale encoding
//! - **Raw fallback**: writes linearly stretched `u16` heightmaps
//!
//! ## Quick Start
//!
//! ```ignore
//! use ter::{read_ter_file, write_ter_file, Altitudes, ReadMode, TerHeader};
//!
//! // First pass: dimensions and scale
//! let mut header = TerHeader::default();
//! read_ter_file("valley.ter", ReadMode::MetadataOnly, &mut header, None, None)?;
//!
//! // Second pass: elevations, in metres
//! let mut alts = vec![0.0f32; header.point_count()];
//! let mut dest = Altitudes::metres(&mut alts[..], &header);
//! read_ter_file("valley.ter", ReadMode::FullDecode, &mut header, Some(&mut dest), None)?;
//!
//! // And back out
//! write_ter_file("copy.ter", &header, &Altitudes::metres(&alts[..], &header))?;
//! ```
//!
//! ## TER Data Format
//!
//! A `.ter` file starts with the 16-byte magic `TERRAGENTERRAIN ` followed by
//! tagged chunks (see [`format`]). Elevations live in the `ALTW` chunk as
//! little-endian `i16` values relative to a per-file base and scale:
//!
//! ```text
//! altitude = base + raw * scale / 65536
//! ```
//!
//! Altitudes are in "point coordinates"; multiply by the Z spacing to get metres.

pub mod byteorder;
pub mod error;
pub mod format;
pub mod grid;
pub mod quantize;
pub mod raw;
pub mod read;
pub mod write;

// Re-export main types at crate root for convenience
pub use byteorder::ByteOrder;
pub use error::{Result, TerError};
pub use grid::{AltRange, Altitudes, TerHeader};
pub use quantize::{QuantParams, RawScaling};
pub use raw::{decode_raw, encode_raw, read_raw_file, write_raw_file, write_raw_file_with};
pub use read::{decode_ter, read_ter_file, ReadMode};
pub use write::{encode_ter, write_ter_file};
