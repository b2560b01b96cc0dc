//! Telemetry frame assembly.

use glove_proto::{Axes, TelemetryFrame, ANGLE_SLOTS};

/// Fixed-point scale applied to inertial readings (two decimal digits).
pub const INERTIAL_SCALE: f32 = 100.0;

/// Error type for frame assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A reading was NaN, infinite, or does not fit an `i16` once scaled.
    InvalidReading,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidReading => write!(f, "invalid inertial reading"),
        }
    }
}

/// Build a frame from five angle slots and one gyro/accel reading.
///
/// Inertial values are scaled by [`INERTIAL_SCALE`] and truncated toward zero.
/// The accelerometer X axis is negated to match how the IMU is mounted on the
/// back of the hand.
///
/// # Errors
///
/// Returns [`FrameError::InvalidReading`] instead of wrapping or saturating.
///
/// # Example
///
/// ```
/// use glove_core::assemble;
///
/// let frame = assemble([0, 10, 20, 30, 40], [0.5, -0.25, 0.0], [1.0, 2.0, -9.81]).unwrap();
/// assert_eq!(frame.gyro.x, 50);
/// assert_eq!(frame.accel.x, -100);
/// assert_eq!(frame.accel.z, -981);
/// ```
pub fn assemble(
    angles: [i16; ANGLE_SLOTS],
    gyro: [f32; 3],
    accel: [f32; 3],
) -> Result<TelemetryFrame, FrameError> {
    Ok(TelemetryFrame {
        angles,
        gyro: Axes::new(fixed(gyro[0])?, fixed(gyro[1])?, fixed(gyro[2])?),
        accel: Axes::new(fixed(-accel[0])?, fixed(accel[1])?, fixed(accel[2])?),
    })
}

/// Scale to fixed-point and truncate, rejecting values that cannot be represented.
fn fixed(value: f32) -> Result<i16, FrameError> {
    let scaled = value * INERTIAL_SCALE;
    // Truncation toward zero keeps (-32769, 32768) inside the i16 range.
    if !scaled.is_finite() || scaled <= -32769.0 || scaled >= 32768.0 {
        return Err(FrameError::InvalidReading);
    }
    Ok(scaled as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANGLES: [i16; ANGLE_SLOTS] = [5, 15, 25, 35, 45];

    #[test]
    fn test_field_placement() {
        let frame = assemble(ANGLES, [1.0, 2.0, 3.0], [4.0, 5.0, 6.0]).unwrap();
        assert_eq!(
            frame.fields(),
            [5, 15, 25, 35, 45, 100, 200, 300, -400, 500, 600]
        );
    }

    #[test]
    fn test_only_accel_x_is_inverted() {
        let frame = assemble(ANGLES, [-1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]).unwrap();
        assert_eq!(frame.gyro, Axes::new(-100, -100, -100));
        assert_eq!(frame.accel, Axes::new(100, -100, -100));
    }

    #[test]
    fn test_truncates_toward_zero() {
        let frame = assemble(ANGLES, [0.019, -0.019, 1.239], [0.0, 0.009, -0.009]).unwrap();
        assert_eq!(frame.gyro, Axes::new(1, -1, 123));
        assert_eq!(frame.accel, Axes::new(0, 0, 0));
    }

    #[test]
    fn test_deterministic() {
        let gyro = [0.123, -4.56, 7.89];
        let accel = [9.81, -0.5, 0.25];
        let a = assemble(ANGLES, gyro, accel).unwrap();
        let b = assemble(ANGLES, gyro, accel).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_rejects_nan_and_infinity() {
        assert_eq!(
            assemble(ANGLES, [f32::NAN, 0.0, 0.0], [0.0; 3]),
            Err(FrameError::InvalidReading)
        );
        assert_eq!(
            assemble(ANGLES, [0.0; 3], [0.0, 0.0, f32::INFINITY]),
            Err(FrameError::InvalidReading)
        );
        assert_eq!(
            assemble(ANGLES, [0.0; 3], [f32::NEG_INFINITY, 0.0, 0.0]),
            Err(FrameError::InvalidReading)
        );
    }

    #[test]
    fn test_rejects_overflow_instead_of_wrapping() {
        // 400 m/s² * 100 = 40000 does not fit in an i16.
        assert_eq!(
            assemble(ANGLES, [0.0; 3], [0.0, 400.0, 0.0]),
            Err(FrameError::InvalidReading)
        );
        assert_eq!(
            assemble(ANGLES, [-330.0, 0.0, 0.0], [0.0; 3]),
            Err(FrameError::InvalidReading)
        );
    }

    #[test]
    fn test_range_edges_accepted() {
        let frame = assemble(ANGLES, [327.67, -327.68, 0.0], [0.0; 3]).unwrap();
        assert!(frame.gyro.x >= 32766);
        assert!(frame.gyro.y <= -32767);
    }
}
