//! Fixed-point altitude quantization.
//!
//! The primary format stores each altitude as an `i16` relative to a per-file
//! base, with a per-file scale spanning the full 16-bit range:
//!
//! ```text
//! altitude = base + raw * (scale / 65536)
//! raw      = round((altitude - base) * 65536 / scale)
//! ```
//!
//! The raw fallback format maps the grid's own min..max linearly onto `0..=65535`
//! and stores nothing else.

use crate::grid::AltRange;

/// Base and scale of an `ALTW` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantParams {
    /// Height of the representable range, in file units.
    pub scale: i16,
    /// Altitude at raw value 0, in file units.
    pub base: i16,
}

impl QuantParams {
    pub fn new(scale: i16, base: i16) -> Self {
        Self { scale, base }
    }

    /// Choose the base and scale covering `range` (in file units).
    ///
    /// The base is the rounded midpoint. The scale is twice the larger distance
    /// from the base to the ceiling of the maximum or the floor of the minimum,
    /// so both extremes fit after rounding. Flat terrain gets a scale of 1.
    pub fn for_range(range: AltRange) -> Self {
        let base = ((range.min + range.max) / 2.0).round();
        let above = (range.max.ceil() - base) * 2.0;
        let below = (base - range.min.floor()) * 2.0;
        let scale = above.max(below).clamp(1.0, i16::MAX as f32);
        Self {
            scale: scale as i16,
            base: narrow_to_i16(base),
        }
    }

    /// Altitude difference between adjacent raw values.
    pub fn step(&self) -> f32 {
        self.scale as f32 / 65536.0
    }

    /// Encode an altitude in file units.
    pub fn quantize(&self, alt: f32) -> i16 {
        // scale is at least 1 for anything produced by `for_range`
        let scale = self.scale.max(1) as f32;
        narrow_to_i16(((alt - self.base as f32) * (65536.0 / scale)).round())
    }

    /// Decode a raw value into file units.
    pub fn dequantize(&self, raw: i16) -> f32 {
        self.base as f32 + raw as f32 * self.step()
    }

    /// The range implied by base and scale alone, `base ± scale / 2`.
    ///
    /// This is an estimate: it neither bounds nor matches the true range of
    /// the samples.
    pub fn estimated_range(&self) -> AltRange {
        let half = 0.5 * self.scale as f32;
        AltRange::new(self.base as f32 - half, self.base as f32 + half)
    }
}

/// Narrow a rounded value to `i16`, saturating at the type bounds. NaN maps to 0.
///
/// Values at the very top of a range (`base + scale / 2`) land on 32768 and
/// become 32767 here instead of wrapping around to the bottom.
pub fn narrow_to_i16(v: f32) -> i16 {
    v.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Narrow a floored value to `u16`, saturating at the type bounds. NaN maps to 0.
pub fn narrow_to_u16(v: f32) -> u16 {
    v.clamp(0.0, u16::MAX as f32) as u16
}

/// Linear mapping used by the raw fallback format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScaling {
    /// Altitude mapped to raw 0, in file units.
    pub min: f32,
    /// Raw units per file unit.
    pub scalar: f32,
}

impl RawScaling {
    /// Map `range` (in file units) onto `0..=65535`. A flat range uses a span of 1e-6.
    pub fn for_range(range: AltRange) -> Self {
        Self {
            min: range.min,
            scalar: 65535.9 / range.span().max(1e-6),
        }
    }

    pub fn encode(&self, alt: f32) -> u16 {
        narrow_to_u16(((alt - self.min) * self.scalar).floor())
    }

    pub fn decode(&self, raw: u16) -> f32 {
        self.min + raw as f32 / self.scalar
    }
}
