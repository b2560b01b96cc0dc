//! Sensor input traits and error types.

use core::future::Future;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Bus or peripheral I/O error.
    Io,
    /// Device did not answer or reported the wrong identity.
    NotFound,
    /// Pin is not an analog channel on this board.
    InvalidChannel,
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::NotFound => write!(f, "device not found"),
            Self::InvalidChannel => write!(f, "not an analog channel"),
        }
    }
}

/// One inertial reading in physical units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuSample {
    /// Angular rate around X/Y/Z in rad/s.
    pub gyro: [f32; 3],
    /// Acceleration along X/Y/Z in m/s².
    pub accel: [f32; 3],
}

/// Async trait for the inertial measurement unit.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ImuSource {
    /// Probe and configure the device. Called once at boot.
    fn init(&mut self) -> impl Future<Output = Result<(), InputError>>;

    /// Read the latest gyroscope and accelerometer values.
    fn read(&mut self) -> impl Future<Output = Result<ImuSample, InputError>>;
}

/// Blocking one-shot ADC.
///
/// Readings are 12-bit (`0..=4095`); implementations may return larger values,
/// which the sensor model clamps.
pub trait AnalogSource {
    /// Sample the analog input on `pin`.
    fn read_raw(&mut self, pin: u8) -> Result<u16, InputError>;
}
