//! Terragen `.ter` file layout: magic, chunk tags and defaults.
//!
//! A file is the 16-byte magic followed by a sequence of chunks, each a 4-byte
//! ASCII tag and a fixed-size little-endian payload:
//!
//! | Tag    | Payload                                   |
//! |--------|-------------------------------------------|
//! | `SIZE` | u16 point count − 1, u16 pad              |
//! | `XPTS` | u16 point count, u16 pad                  |
//! | `YPTS` | u16 point count, u16 pad                  |
//! | `SCAL` | f32 × 3 point spacing in metres           |
//! | `CRAD` | f32 planet radius in km                   |
//! | `CRVM` | u16 curvature mode, u16 pad               |
//! | `ALTW` | i16 scale, i16 base, i16 × points (+ pad) |
//! | `EOF ` | none                                      |

/// The first 16 bytes of every terrain file.
pub const MAGIC: &[u8; 16] = b"TERRAGENTERRAIN ";

/// Point spacing used when a file has no `SCAL` chunk.
pub const DEFAULT_SCALE_M: [f32; 3] = [30.0, 30.0, 30.0];

/// Planet radius used when a file has no `CRAD` chunk.
pub const DEFAULT_PLANET_RADIUS_KM: f32 = 6370.0;

/// Curvature mode used when a file has no `CRVM` chunk.
pub const DEFAULT_CURVE_MODE: u32 = 0;

/// A chunk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Square grid shorthand.
    Size,
    Xpts,
    Ypts,
    /// Point spacing.
    Scal,
    /// Planet curvature radius.
    Crad,
    /// Curvature mode.
    Crvm,
    /// Altitude data; always the last substantive chunk.
    Altw,
    /// End of file without elevation data.
    Eof,
}

impl Tag {
    /// Parse a tag from its 4 bytes, or `None` for anything outside the known set.
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        match &bytes {
            b"SIZE" => Some(Tag::Size),
            b"XPTS" => Some(Tag::Xpts),
            b"YPTS" => Some(Tag::Ypts),
            b"SCAL" => Some(Tag::Scal),
            b"CRAD" => Some(Tag::Crad),
            b"CRVM" => Some(Tag::Crvm),
            b"ALTW" => Some(Tag::Altw),
            b"EOF " => Some(Tag::Eof),
            _ => None,
        }
    }

    /// The tag as written to the file.
    pub fn as_bytes(&self) -> &'static [u8; 4] {
        match self {
            Tag::Size => b"SIZE",
            Tag::Xpts => b"XPTS",
            Tag::Ypts => b"YPTS",
            Tag::Scal => b"SCAL",
            Tag::Crad => b"CRAD",
            Tag::Crvm => b"CRVM",
            Tag::Altw => b"ALTW",
            Tag::Eof => b"EOF ",
        }
    }

    /// The tag as text, for messages.
    pub fn as_str(&self) -> &'static str {
        // All tags are ASCII
        std::str::from_utf8(self.as_bytes()).unwrap_or("????")
    }
}
