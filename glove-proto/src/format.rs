//! No-std number formatting for the serial diagnostic line.
//!
//! The line mirrors what the glove prints every control-loop pass: the five
//! angles as integers, then the six inertial values converted back from
//! fixed-point with two decimals.
//!
//! ```text
//! 12, 0, 45, 90, 3, 0.05, -1.20, 0.00, -9.81, 0.34, 0.12
//! ```

use crate::frame::{SerializeError, TelemetryFrame};

/// Longest possible diagnostic line.
///
/// Breakdown: 5 angles × 6 + 6 inertial values × 7 (`-327.68`) + 10 separators × 2 = 92.
/// We use 96 for margin.
pub const MAX_FRAME_LINE_LEN: usize = 96;

/// Write an i16 as a signed decimal string.
///
/// Returns the number of bytes written (1-6 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 6` (max size: "-32768").
#[inline]
pub fn write_i16(buf: &mut [u8], value: i16) -> usize {
    debug_assert!(buf.len() >= 6, "buffer too small for i16");

    let mut pos = 0;
    if value < 0 {
        buf[0] = b'-';
        pos = 1;
    }
    pos + write_u16(&mut buf[pos..], value.unsigned_abs())
}

/// Write a fixed-point value (×100) as a decimal with exactly two fraction digits.
///
/// Returns the number of bytes written (4-7 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 7` (max size: "-327.68").
#[inline]
pub fn write_centi(buf: &mut [u8], value: i16) -> usize {
    debug_assert!(buf.len() >= 7, "buffer too small for centi value");

    let mut pos = 0;
    if value < 0 {
        buf[0] = b'-';
        pos = 1;
    }
    let abs = value.unsigned_abs();
    pos += write_u16(&mut buf[pos..], abs / 100);
    let frac = (abs % 100) as u8;
    buf[pos] = b'.';
    buf[pos + 1] = b'0' + frac / 10;
    buf[pos + 2] = b'0' + frac % 10;
    pos + 3
}

fn write_u16(buf: &mut [u8], value: u16) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Digits come out least significant first.
    let mut temp = [0u8; 5];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
    }

    for i in 0..len {
        buf[i] = temp[len - 1 - i];
    }
    len
}

/// Write the diagnostic line for `frame` (without a line terminator).
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`SerializeError::BufferTooSmall`] if `buf` is shorter than
/// [`MAX_FRAME_LINE_LEN`].
pub fn write_frame_line(buf: &mut [u8], frame: &TelemetryFrame) -> Result<usize, SerializeError> {
    if buf.len() < MAX_FRAME_LINE_LEN {
        return Err(SerializeError::BufferTooSmall);
    }

    let mut pos = 0;
    for (i, field) in frame.fields().into_iter().enumerate() {
        if i > 0 {
            buf[pos] = b',';
            buf[pos + 1] = b' ';
            pos += 2;
        }
        pos += if i < crate::frame::ANGLE_SLOTS {
            write_i16(&mut buf[pos..], field)
        } else {
            write_centi(&mut buf[pos..], field)
        };
    }
    Ok(pos)
}
