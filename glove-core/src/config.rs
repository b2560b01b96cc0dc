//! Board configuration: pins, calibration constants, and timing.
//!
//! Every hardware revision of the glove differs only in the values held here,
//! so the variants are plain `const` records. Pick one at compile time (the
//! board crate does this with Cargo features) and validate it at startup with
//! [`GloveConfig::validate`].

use glove_proto::ANGLE_SLOTS;

/// Number of flex sensors on the glove.
pub const FLEX_COUNT: usize = ANGLE_SLOTS;

/// Largest raw reading of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Linear calibration of one flex sensor, measured offline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorCalibration {
    /// Resistance with the finger straight, in ohms.
    pub flat_ohms: f32,
    /// Resistance with the finger bent to 90°, in ohms.
    pub bend_ohms: f32,
}

impl SensorCalibration {
    #[must_use]
    pub const fn new(flat_ohms: f32, bend_ohms: f32) -> Self {
        Self {
            flat_ohms,
            bend_ohms,
        }
    }
}

/// One flex sensor: the analog pin it is wired to and its calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlexChannel {
    pub pin: u8,
    pub calibration: SensorCalibration,
}

/// Timing constants for the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Minimum spacing between telemetry notifications.
    pub transmit_interval_ms: u64,
    /// Quiescent window after an accepted button press.
    pub debounce_ms: u64,
    /// How long the boot splash stays up.
    pub splash_ms: u64,
    /// Duration of one loading-spinner frame.
    pub spinner_frame_ms: u64,
    /// Number of spinner frames shown while waiting for a connection.
    pub spinner_frames: u8,
    /// How long the wiring hint stays up before the pin list replaces it.
    pub fault_hold_ms: u64,
}

/// Default timing, matching the shipped firmware.
pub const DEFAULT_TIMING: Timing = Timing {
    transmit_interval_ms: 100,
    debounce_ms: 200,
    splash_ms: 2000,
    spinner_frame_ms: 200,
    spinner_frames: 12,
    fault_hold_ms: 5000,
};

/// Complete configuration record for one glove build.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GloveConfig {
    /// Flex sensors, thumb first.
    pub flex: [FlexChannel; FLEX_COUNT],
    /// Whether the flex sensors are fitted. When `false` the angle slots are sent as zero.
    pub flex_present: bool,
    /// Divider supply voltage.
    pub supply_volts: f32,
    /// Fixed resistor of the voltage divider, in ohms.
    pub divider_ohms: f32,
    /// Clamp angles to 90° in addition to the 0° floor.
    pub clamp_ceiling: bool,
    /// Warm-up samples taken per sensor before each acquisition.
    pub warmup_passes: u16,
    /// Push-button GPIO (pull-up, active low).
    pub button_pin: u8,
    /// IMU I²C data pin.
    pub imu_sda_pin: u8,
    /// IMU I²C clock pin.
    pub imu_scl_pin: u8,
    pub timing: Timing,
}

/// Analog pins of the five flex sensors on the reference board.
pub const FLEX_PINS: [u8; FLEX_COUNT] = [36, 39, 32, 33, 26];

/// Per-sensor calibration measured on the reference glove.
pub const PER_SENSOR_CALIBRATION: [SensorCalibration; FLEX_COUNT] = [
    SensorCalibration::new(54_642.0, 158_494.0),
    SensorCalibration::new(57_937.0, 125_896.0),
    SensorCalibration::new(44_730.0, 68_138.0),
    SensorCalibration::new(60_732.0, 136_138.0),
    SensorCalibration::new(48_805.0, 134_915.0),
];

/// Single flat/bend pair used by builds without per-finger measurements.
// TODO: replace with a flat/bend pair measured on a shared-calibration glove.
pub const SHARED_CALIBRATION: SensorCalibration = SensorCalibration::new(37_300.0, 90_000.0);

/// Pair each pin with its calibration.
#[must_use]
pub const fn channels(
    pins: [u8; FLEX_COUNT],
    calibration: [SensorCalibration; FLEX_COUNT],
) -> [FlexChannel; FLEX_COUNT] {
    let mut out = [FlexChannel {
        pin: 0,
        calibration: SensorCalibration::new(0.0, 0.0),
    }; FLEX_COUNT];
    let mut i = 0;
    while i < FLEX_COUNT {
        out[i] = FlexChannel {
            pin: pins[i],
            calibration: calibration[i],
        };
        i += 1;
    }
    out
}

/// Reference glove with individually calibrated sensors.
pub const PER_SENSOR_CONFIG: GloveConfig = GloveConfig {
    flex: channels(FLEX_PINS, PER_SENSOR_CALIBRATION),
    flex_present: true,
    supply_volts: 5.0,
    divider_ohms: 10_000.0,
    clamp_ceiling: false,
    warmup_passes: 32,
    button_pin: 35,
    imu_sda_pin: 21,
    imu_scl_pin: 22,
    timing: DEFAULT_TIMING,
};

/// Glove sharing one calibration pair across all fingers.
pub const SHARED_CONFIG: GloveConfig = GloveConfig {
    flex: channels(FLEX_PINS, [SHARED_CALIBRATION; FLEX_COUNT]),
    ..PER_SENSOR_CONFIG
};

/// IMU-only build: no flex sensors fitted, angle slots are zero.
pub const IMU_ONLY_CONFIG: GloveConfig = GloveConfig {
    flex_present: false,
    warmup_passes: 0,
    ..PER_SENSOR_CONFIG
};

/// Default configuration.
pub const DEFAULT_CONFIG: GloveConfig = PER_SENSOR_CONFIG;

impl GloveConfig {
    /// Check the calibration constants before any angle math runs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found. Sensor checks are skipped when
    /// `flex_present` is `false`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.flex_present {
            return Ok(());
        }
        if !(self.supply_volts.is_finite() && self.supply_volts > 0.0) {
            return Err(ConfigError::Supply);
        }
        if !(self.divider_ohms.is_finite() && self.divider_ohms > 0.0) {
            return Err(ConfigError::Divider);
        }
        for (sensor, channel) in self.flex.iter().enumerate() {
            let SensorCalibration {
                flat_ohms,
                bend_ohms,
            } = channel.calibration;
            if !(flat_ohms.is_finite() && bend_ohms.is_finite()) || flat_ohms < 0.0 {
                return Err(ConfigError::InvalidCalibration { sensor });
            }
            if flat_ohms == bend_ohms {
                return Err(ConfigError::DegenerateCalibration { sensor });
            }
            if flat_ohms > bend_ohms {
                return Err(ConfigError::InvertedCalibration { sensor });
            }
        }
        Ok(())
    }
}

/// Fatal configuration problems found by [`GloveConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Supply voltage is zero, negative, or not finite.
    Supply,
    /// Divider resistance is zero, negative, or not finite.
    Divider,
    /// Calibration values are negative or not finite.
    InvalidCalibration { sensor: usize },
    /// Flat and bent resistance are equal; the angle mapping would divide by zero.
    DegenerateCalibration { sensor: usize },
    /// Flat resistance exceeds bent resistance; the mapping would not be monotonic.
    InvertedCalibration { sensor: usize },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Supply => write!(f, "invalid supply voltage"),
            Self::Divider => write!(f, "invalid divider resistance"),
            Self::InvalidCalibration { sensor } => write!(f, "sensor {}: invalid calibration", sensor),
            Self::DegenerateCalibration { sensor } => {
                write!(f, "sensor {}: flat and bend resistance are equal", sensor)
            }
            Self::InvertedCalibration { sensor } => {
                write!(f, "sensor {}: flat resistance exceeds bend resistance", sensor)
            }
        }
    }
}
