//! Byte-order primitives.
//!
//! Fixed-width integers and IEEE-754 floats in little-endian ("Intel") or
//! big-endian ("Motorola") order. Floats travel as their bit pattern through
//! the `u32` transform, so NaN payloads and signed zeros survive unchanged.
//!
//! Readers use `read_exact`: running out of input surfaces as
//! [`std::io::ErrorKind::UnexpectedEof`] and it is up to the caller to decide
//! what that means.

use std::io::{self, Read, Write};

/// Byte order for multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Intel,
    /// Most significant byte first.
    Motorola,
}

impl ByteOrder {
    /// Write a `u16` in this byte order.
    pub fn write_u16<W: Write>(self, w: &mut W, val: u16) -> io::Result<()> {
        match self {
            ByteOrder::Intel => write_u16_le(w, val),
            ByteOrder::Motorola => write_u16_be(w, val),
        }
    }

    /// Read a `u16` in this byte order.
    pub fn read_u16<R: Read>(self, r: &mut R) -> io::Result<u16> {
        match self {
            ByteOrder::Intel => read_u16_le(r),
            ByteOrder::Motorola => read_u16_be(r),
        }
    }
}

pub fn write_u16_le<W: Write>(w: &mut W, val: u16) -> io::Result<()> {
    w.write_all(&val.to_le_bytes())
}

pub fn write_u16_be<W: Write>(w: &mut W, val: u16) -> io::Result<()> {
    w.write_all(&val.to_be_bytes())
}

pub fn read_u16_le<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u16_be<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

pub fn write_u32_le<W: Write>(w: &mut W, val: u32) -> io::Result<()> {
    w.write_all(&val.to_le_bytes())
}

pub fn write_u32_be<W: Write>(w: &mut W, val: u32) -> io::Result<()> {
    w.write_all(&val.to_be_bytes())
}

pub fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_u32_be<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

pub fn write_f32_le<W: Write>(w: &mut W, val: f32) -> io::Result<()> {
    write_u32_le(w, val.to_bits())
}

pub fn write_f32_be<W: Write>(w: &mut W, val: f32) -> io::Result<()> {
    write_u32_be(w, val.to_bits())
}

pub fn read_f32_le<R: Read>(r: &mut R) -> io::Result<f32> {
    read_u32_le(r).map(f32::from_bits)
}

pub fn read_f32_be<R: Read>(r: &mut R) -> io::Result<f32> {
    read_u32_be(r).map(f32::from_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_u16_layout() {
        let mut out = Vec::new();
        write_u16_le(&mut out, 0x1234).unwrap();
        write_u16_be(&mut out, 0x1234).unwrap();
        assert_eq!(out, [0x34, 0x12, 0x12, 0x34]);

        let mut r = Cursor::new(out);
        assert_eq!(read_u16_le(&mut r).unwrap(), 0x1234);
        assert_eq!(read_u16_be(&mut r).unwrap(), 0x1234);
    }

    #[test]
    fn test_u32_layout() {
        let mut out = Vec::new();
        write_u32_le(&mut out, 0x0A0B_0C0D).unwrap();
        write_u32_be(&mut out, 0x0A0B_0C0D).unwrap();
        assert_eq!(out, [0x0D, 0x0C, 0x0B, 0x0A, 0x0A, 0x0B, 0x0C, 0x0D]);

        let mut r = Cursor::new(out);
        assert_eq!(read_u32_le(&mut r).unwrap(), 0x0A0B_0C0D);
        assert_eq!(read_u32_be(&mut r).unwrap(), 0x0A0B_0C0D);
    }

    #[test]
    fn test_f32_is_bit_pattern() {
        // 30.0f32 == 0x41F00000
        let mut out = Vec::new();
        write_f32_le(&mut out, 30.0).unwrap();
        assert_eq!(out, [0x00, 0x00, 0xF0, 0x41]);

        out.clear();
        write_f32_be(&mut out, -0.0).unwrap();
        assert_eq!(out, [0x80, 0x00, 0x00, 0x00]);
        let v = read_f32_be(&mut Cursor::new(&out)).unwrap();
        assert!(v == 0.0 && v.is_sign_negative());
    }

    #[test]
    fn test_short_read_is_eof() {
        let mut r = Cursor::new([0x01u8, 0x02, 0x03]);
        let err = read_u32_le(&mut r).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_byte_order_dispatch() {
        let mut out = Vec::new();
        ByteOrder::Intel.write_u16(&mut out, 0xBEEF).unwrap();
        ByteOrder::Motorola.write_u16(&mut out, 0xBEEF).unwrap();
        assert_eq!(out, [0xEF, 0xBE, 0xBE, 0xEF]);

        let mut r = Cursor::new(out);
        assert_eq!(ByteOrder::Intel.read_u16(&mut r).unwrap(), 0xBEEF);
        assert_eq!(ByteOrder::Motorola.read_u16(&mut r).unwrap(), 0xBEEF);
        assert_eq!(ByteOrder::default(), ByteOrder::Intel);
    }
}
