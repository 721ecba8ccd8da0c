//! Caller-side types: the header, the sample buffer descriptor and altitude ranges.

use crate::error::{Result, TerError};
use crate::format::{DEFAULT_CURVE_MODE, DEFAULT_PLANET_RADIUS_KM, DEFAULT_SCALE_M};

/// Dimensions and scale metadata of a terrain grid.
///
/// # Example
///
/// ```
/// use ter::TerHeader;
///
/// let header = TerHeader::new(513, 513);
/// assert_eq!(header.point_count(), 513 * 513);
/// assert_eq!(header.scale_m, [30.0, 30.0, 30.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerHeader {
    /// Number of points along X (e.g. 513).
    pub points_x: u32,
    /// Number of points along Y.
    pub points_y: u32,
    /// Point spacing in metres. Keep X = Y = Z for best compatibility.
    pub scale_m: [f32; 3],
    /// Planet curvature radius in kilometres.
    pub planet_radius_km: f32,
    /// Planet curvature mode.
    pub curve_mode: u32,
}

impl TerHeader {
    /// Create a header for a grid of the given size with default scale metadata.
    pub fn new(points_x: u32, points_y: u32) -> Self {
        Self {
            points_x,
            points_y,
            ..Self::default()
        }
    }

    /// Total number of grid points.
    pub fn point_count(&self) -> usize {
        self.points_x as usize * self.points_y as usize
    }

    /// Whether the header carries no dimensions (e.g. the file had none).
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Check the dimensions can be written: non-empty and within 16 bits per axis.
    pub(crate) fn check_writable(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TerError::EmptyGrid {
                points_x: self.points_x,
                points_y: self.points_y,
            });
        }
        if self.points_x > u16::MAX as u32 || self.points_y > u16::MAX as u32 {
            return Err(TerError::DimensionsTooLarge {
                points_x: self.points_x,
                points_y: self.points_y,
            });
        }
        Ok(())
    }
}

impl Default for TerHeader {
    fn default() -> Self {
        Self {
            points_x: 0,
            points_y: 0,
            scale_m: DEFAULT_SCALE_M,
            planet_radius_km: DEFAULT_PLANET_RADIUS_KM,
            curve_mode: DEFAULT_CURVE_MODE,
        }
    }
}

/// A borrowed view over caller-allocated altitude samples.
///
/// Writers take `Altitudes<&[f32]>`, the reader fills `Altitudes<&mut [f32]>`.
/// Grid point `i` lives at `alts[i * stride]`, so samples can be interleaved
/// with other data.
///
/// The multipliers convert between caller units and file units and are
/// applied exactly as given. Usually `read_multiplier == 1.0 / write_multiplier`.
#[derive(Debug)]
pub struct Altitudes<B> {
    /// The sample storage.
    pub alts: B,
    /// Elements to advance per grid point. Must be at least 1.
    pub stride: usize,
    /// Applied to decoded values when reading.
    pub read_multiplier: f32,
    /// Applied to caller values before encoding.
    pub write_multiplier: f32,
}

impl<B> Altitudes<B> {
    pub fn new(alts: B, stride: usize, read_multiplier: f32, write_multiplier: f32) -> Self {
        Self {
            alts,
            stride,
            read_multiplier,
            write_multiplier,
        }
    }

    /// Tightly packed samples in file units.
    pub fn packed(alts: B) -> Self {
        Self::new(alts, 1, 1.0, 1.0)
    }

    /// Tightly packed samples in metres, converted using the header's Z spacing.
    pub fn metres(alts: B, header: &TerHeader) -> Self {
        let z = header.scale_m[2];
        Self::new(alts, 1, z, 1.0 / z)
    }

    /// Check a buffer of `len` elements holds `points` samples at this stride.
    fn check_covers(&self, len: usize, points: usize) -> Result<()> {
        if self.stride == 0 {
            return Err(TerError::InvalidStride);
        }
        // An overflowing requirement can never be met
        let needed = required_len(points, self.stride).unwrap_or(usize::MAX);
        if len < needed {
            return Err(TerError::BufferTooSmall { needed, actual: len });
        }
        Ok(())
    }
}

/// Number of buffer elements needed to hold `points` samples at `stride`.
///
/// `None` if the count does not fit in `usize`.
fn required_len(points: usize, stride: usize) -> Option<usize> {
    match points {
        0 => Some(0),
        n => (n - 1).checked_mul(stride)?.checked_add(1),
    }
}

impl<B: AsRef<[f32]>> Altitudes<B> {
    /// Iterate over the first `points` grid samples, in caller units.
    pub fn samples(&self, points: usize) -> Result<impl Iterator<Item = f32> + '_> {
        let alts = self.alts.as_ref();
        self.check_covers(alts.len(), points)?;
        Ok(alts.iter().step_by(self.stride).take(points).copied())
    }

    /// Iterate over the first `points` grid samples with the write multiplier applied.
    pub(crate) fn file_units(&self, points: usize) -> Result<impl Iterator<Item = f32> + '_> {
        let mult = self.write_multiplier;
        Ok(self.samples(points)?.map(move |v| v * mult))
    }
}

impl<B: AsMut<[f32]>> Altitudes<B> {
    /// Mutable access to the first `points` grid samples.
    pub(crate) fn slots_mut(&mut self, points: usize) -> Result<impl Iterator<Item = &mut f32>> {
        let len = self.alts.as_mut().len();
        self.check_covers(len, points)?;
        let stride = self.stride;
        Ok(self.alts.as_mut().iter_mut().step_by(stride).take(points))
    }
}

/// Minimum and maximum altitude over a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AltRange {
    pub min: f32,
    pub max: f32,
}

impl AltRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True range over a sequence of values. NaNs are ignored.
    ///
    /// Returns `None` if there is no non-NaN value.
    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        (min <= max).then_some(Self { min, max })
    }

    /// Scan every grid sample described by `header` in caller units.
    pub fn scan<B: AsRef<[f32]>>(header: &TerHeader, data: &Altitudes<B>) -> Result<Option<Self>> {
        Ok(Self::from_values(data.samples(header.point_count())?))
    }

    /// `max - min`.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}
