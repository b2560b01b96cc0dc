//! Telemetry frame type and its fixed 22-byte encoding.

/// Number of bend-angle slots at the start of a frame (one per finger).
pub const ANGLE_SLOTS: usize = 5;

/// Total number of `i16` fields in a frame.
pub const FRAME_FIELDS: usize = 11;

/// Encoded frame size in bytes.
pub const FRAME_LEN: usize = FRAME_FIELDS * 2;

/// Three inertial axes in fixed-point (physical value × 100).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes {
    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };
}

/// One telemetry record, rebuilt every transmit tick.
///
/// Field order on the wire is fixed:
/// `[angle0..angle4, gyroX, gyroY, gyroZ, accelX, accelY, accelZ]`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame {
    /// Bend angles in whole degrees, thumb first.
    pub angles: [i16; ANGLE_SLOTS],
    /// Angular rate, rad/s × 100.
    pub gyro: Axes,
    /// Acceleration, m/s² × 100.
    pub accel: Axes,
}

impl TelemetryFrame {
    /// All-zero frame.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            angles: [0; ANGLE_SLOTS],
            gyro: Axes::ZERO,
            accel: Axes::ZERO,
        }
    }

    /// Build a frame from its eleven fields in wire order.
    #[must_use]
    pub const fn from_fields(f: [i16; FRAME_FIELDS]) -> Self {
        Self {
            angles: [f[0], f[1], f[2], f[3], f[4]],
            gyro: Axes::new(f[5], f[6], f[7]),
            accel: Axes::new(f[8], f[9], f[10]),
        }
    }

    /// The eleven fields in wire order.
    #[must_use]
    pub const fn fields(&self) -> [i16; FRAME_FIELDS] {
        let a = self.angles;
        [
            a[0],
            a[1],
            a[2],
            a[3],
            a[4],
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
            self.accel.x,
            self.accel.y,
            self.accel.z,
        ]
    }

    /// Encode as 22 little-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        for (chunk, field) in out.chunks_exact_mut(2).zip(self.fields()) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }

    /// Encode into the provided buffer.
    ///
    /// Returns the number of bytes written (always [`FRAME_LEN`]).
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `buf` is shorter than [`FRAME_LEN`].
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let dst = buf
            .get_mut(..FRAME_LEN)
            .ok_or(SerializeError::BufferTooSmall)?;
        dst.copy_from_slice(&self.to_bytes());
        Ok(FRAME_LEN)
    }

    /// Decode a frame received from the glove.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Length`] unless `bytes` is exactly [`FRAME_LEN`] long.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != FRAME_LEN {
            return Err(DecodeError::Length(bytes.len()));
        }
        let mut fields = [0i16; FRAME_FIELDS];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(2)) {
            *field = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
        Ok(Self::from_fields(fields))
    }

    /// Render the serial diagnostic line for this frame.
    #[cfg(feature = "heapless")]
    #[must_use]
    pub fn diagnostic_line(&self) -> heapless::String<{ crate::format::MAX_FRAME_LINE_LEN }> {
        let mut buf = [0u8; crate::format::MAX_FRAME_LINE_LEN];
        let mut line = heapless::String::new();
        if let Ok(len) = crate::format::write_frame_line(&mut buf, self) {
            // Only ASCII digits, signs, dots, commas and spaces are written.
            for &b in &buf[..len] {
                let _ = line.push(b as char);
            }
        }
        line
    }
}

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the encoded data.
    BufferTooSmall,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// Error type for decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload length differs from [`FRAME_LEN`]; carries the received length.
    Length(usize),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length(len) => write!(f, "expected {} bytes, got {}", FRAME_LEN, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TelemetryFrame {
        TelemetryFrame {
            angles: [0, 15, 45, 90, 120],
            gyro: Axes::new(12, -7, 0),
            accel: Axes::new(-981, 34, i16::MIN),
        }
    }

    #[test]
    fn test_frame_is_22_bytes() {
        assert_eq!(FRAME_LEN, 22);
        assert_eq!(sample().to_bytes().len(), 22);
    }

    #[test]
    fn test_field_order_on_wire() {
        let frame = TelemetryFrame::from_fields([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        let bytes = frame.to_bytes();
        for (i, chunk) in bytes.chunks_exact(2).enumerate() {
            assert_eq!(i16::from_le_bytes([chunk[0], chunk[1]]), i as i16 + 1);
        }
        assert_eq!(frame.gyro, Axes::new(6, 7, 8));
        assert_eq!(frame.accel, Axes::new(9, 10, 11));
    }

    #[test]
    fn test_little_endian_negative_values() {
        let frame = TelemetryFrame::from_fields([-1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let bytes = frame.to_bytes();
        assert_eq!(&bytes[..2], &[0xFF, 0xFF]);

        let frame = TelemetryFrame::from_fields([0x0102, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&frame.to_bytes()[..2], &[0x02, 0x01]);
    }

    #[test]
    fn test_decode_matches_encode() {
        let frame = sample();
        assert_eq!(TelemetryFrame::decode(&frame.to_bytes()), Ok(frame));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(TelemetryFrame::decode(&[0u8; 21]), Err(DecodeError::Length(21)));
        assert_eq!(TelemetryFrame::decode(&[0u8; 23]), Err(DecodeError::Length(23)));
        assert_eq!(TelemetryFrame::decode(&[]), Err(DecodeError::Length(0)));
    }

    #[test]
    fn test_encode_into_larger_buffer() {
        let mut buf = [0xAAu8; 32];
        let len = sample().encode(&mut buf).unwrap();
        assert_eq!(len, FRAME_LEN);
        assert_eq!(&buf[..FRAME_LEN], &sample().to_bytes());
        assert_eq!(buf[FRAME_LEN], 0xAA);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 10];
        assert_eq!(sample().encode(&mut buf), Err(SerializeError::BufferTooSmall));
    }

    #[test]
    fn test_zeroed() {
        assert_eq!(TelemetryFrame::zeroed().to_bytes(), [0u8; FRAME_LEN]);
        assert_eq!(TelemetryFrame::zeroed(), TelemetryFrame::default());
    }
}
