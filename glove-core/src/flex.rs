//! Resistive flex sensor model.
//!
//! Each sensor sits on the high side of a voltage divider whose low side is a
//! fixed resistor. The ADC measures the voltage across the fixed resistor,
//! from which the sensor's resistance follows:
//!
//! ```text
//! Vflex = raw * Vcc / 4095
//! Rflex = Rdiv * (Vcc / Vflex - 1)
//! ```
//!
//! The resistance is then mapped linearly from the sensor's own
//! `[flat, bend]` interval onto `[0°, 90°]`.

use crate::config::{FlexChannel, GloveConfig, SensorCalibration, ADC_MAX, FLEX_COUNT};

/// Angle reached at the bent-pose resistance.
pub const FULL_BEND_DEGREES: f32 = 90.0;

/// One flex sensor with its most recent raw sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlexSensor {
    pin: u8,
    calibration: SensorCalibration,
    supply_volts: f32,
    divider_ohms: f32,
    clamp_ceiling: bool,
    raw: u16,
    /// Smallest and largest warm-up sample seen so far.
    observed: Option<(u16, u16)>,
}

impl FlexSensor {
    /// Create a sensor from its channel description and divider parameters.
    #[must_use]
    pub const fn new(channel: FlexChannel, supply_volts: f32, divider_ohms: f32) -> Self {
        Self {
            pin: channel.pin,
            calibration: channel.calibration,
            supply_volts,
            divider_ohms,
            clamp_ceiling: false,
            raw: 0,
            observed: None,
        }
    }

    /// Create all five sensors described by `config`.
    #[must_use]
    pub fn from_config(config: &GloveConfig) -> [Self; FLEX_COUNT] {
        config.flex.map(|channel| Self {
            clamp_ceiling: config.clamp_ceiling,
            ..Self::new(channel, config.supply_volts, config.divider_ohms)
        })
    }

    /// Analog pin this sensor is wired to.
    #[inline]
    #[must_use]
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    #[inline]
    #[must_use]
    pub const fn calibration(&self) -> SensorCalibration {
        self.calibration
    }

    /// Most recent raw sample.
    #[inline]
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Feed a warm-up sample. Only the observed range is updated.
    pub fn calibrate(&mut self, raw: u16) {
        let raw = raw.min(ADC_MAX);
        self.observed = Some(match self.observed {
            Some((lo, hi)) => (lo.min(raw), hi.max(raw)),
            None => (raw, raw),
        });
    }

    /// Store a new raw sample, clamped to the ADC range.
    #[inline]
    pub fn update(&mut self, raw: u16) {
        self.raw = raw.min(ADC_MAX);
    }

    /// Smallest and largest warm-up sample seen since power-up.
    #[inline]
    #[must_use]
    pub const fn observed_range(&self) -> Option<(u16, u16)> {
        self.observed
    }

    /// Voltage across the divider resistor for the stored sample.
    #[must_use]
    pub fn voltage(&self) -> f32 {
        f32::from(self.raw) * self.supply_volts / f32::from(ADC_MAX)
    }

    /// Sensor resistance in ohms. Infinite for a zero reading (open circuit).
    #[must_use]
    pub fn resistance(&self) -> f32 {
        self.divider_ohms * (self.supply_volts / self.voltage() - 1.0)
    }

    /// Bend angle in degrees, floored at 0.
    ///
    /// Resistances past the bent-pose value extrapolate beyond 90° unless the
    /// configuration enables the ceiling clamp.
    #[must_use]
    pub fn angle_degrees(&self) -> f32 {
        let SensorCalibration {
            flat_ohms,
            bend_ohms,
        } = self.calibration;
        let angle = map_range(self.resistance(), flat_ohms, bend_ohms, 0.0, FULL_BEND_DEGREES);
        let angle = if angle < 0.0 { 0.0 } else { angle };
        if self.clamp_ceiling && angle > FULL_BEND_DEGREES {
            FULL_BEND_DEGREES
        } else {
            angle
        }
    }

    /// Angle truncated toward zero for the telemetry frame.
    ///
    /// The cast saturates, so an open-circuit reading yields `i16::MAX`.
    #[inline]
    #[must_use]
    pub fn angle_slot(&self) -> i16 {
        self.angle_degrees() as i16
    }
}

/// Linear interpolation of `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Values outside the input interval extrapolate.
#[inline]
#[must_use]
pub fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CONFIG, PER_SENSOR_CALIBRATION};

    fn sensor(flat: f32, bend: f32) -> FlexSensor {
        FlexSensor::new(
            FlexChannel {
                pin: 36,
                calibration: SensorCalibration::new(flat, bend),
            },
            5.0,
            10_000.0,
        )
    }

    fn near(a: f32, b: f32, tolerance: f32) -> bool {
        a - b < tolerance && b - a < tolerance
    }

    /// Raw reading that produces `ohms` across the flex sensor.
    fn raw_for(ohms: f32) -> u16 {
        (4095.0 * 10_000.0 / (10_000.0 + ohms)) as u16
    }

    #[test]
    fn test_resistance_from_divider() {
        let mut s = sensor(20_000.0, 60_000.0);
        // Half scale: Vflex = Vcc / 2, so Rflex = Rdiv.
        s.update(2047);
        let r = s.resistance();
        assert!(near(r, 10_000.0, 10.0), "r = {}", r);
    }

    #[test]
    fn test_map_range_extrapolates() {
        assert_eq!(map_range(50.0, 0.0, 100.0, 0.0, 90.0), 45.0);
        assert_eq!(map_range(200.0, 0.0, 100.0, 0.0, 90.0), 180.0);
        assert_eq!(map_range(-100.0, 0.0, 100.0, 0.0, 90.0), -90.0);
    }

    #[test]
    fn test_angle_at_calibration_points() {
        let mut s = sensor(20_000.0, 60_000.0);

        s.update(raw_for(60_000.0));
        let bent = s.angle_degrees();
        assert!(near(bent, 90.0, 1.0), "bent = {}", bent);

        s.update(raw_for(40_000.0));
        let half = s.angle_degrees();
        assert!(near(half, 45.0, 1.0), "half = {}", half);
    }

    #[test]
    fn test_zero_at_or_below_flat_resistance() {
        let mut s = sensor(20_000.0, 60_000.0);
        // Every reading at or above the flat point maps to resistance <= flat.
        let flat_raw = raw_for(20_000.0) + 2;
        for raw in flat_raw..=ADC_MAX {
            s.update(raw);
            assert!(s.resistance() <= 20_000.0);
            assert_eq!(s.angle_degrees(), 0.0, "raw = {}", raw);
            assert_eq!(s.angle_slot(), 0);
        }
    }

    #[test]
    fn test_angle_monotonic_in_resistance() {
        // Raising the raw reading lowers the sensed resistance, so the angle
        // never increases with the raw value.
        for cal in PER_SENSOR_CALIBRATION {
            let mut s = sensor(cal.flat_ohms, cal.bend_ohms);
            let mut previous = f32::INFINITY;
            for raw in 1..=ADC_MAX {
                s.update(raw);
                let angle = s.angle_degrees();
                assert!(angle >= 0.0);
                assert!(angle <= previous, "raw = {}", raw);
                previous = angle;
            }
        }
    }

    #[test]
    fn test_extrapolates_past_90_without_ceiling() {
        let mut s = sensor(20_000.0, 60_000.0);
        s.update(raw_for(100_000.0));
        assert!(s.angle_degrees() > 90.0);
        assert!(s.angle_slot() > 90);
    }

    #[test]
    fn test_ceiling_clamp_when_enabled() {
        let mut config = DEFAULT_CONFIG;
        config.clamp_ceiling = true;
        let mut sensors = FlexSensor::from_config(&config);
        sensors[0].update(raw_for(1_000_000.0));
        assert_eq!(sensors[0].angle_degrees(), 90.0);
        assert_eq!(sensors[0].angle_slot(), 90);
    }

    #[test]
    fn test_zero_reading_saturates() {
        let mut s = sensor(20_000.0, 60_000.0);
        s.update(0);
        assert!(s.resistance().is_infinite());
        assert_eq!(s.angle_slot(), i16::MAX);
    }

    #[test]
    fn test_update_clamps_to_adc_range() {
        let mut s = sensor(20_000.0, 60_000.0);
        s.update(u16::MAX);
        assert_eq!(s.raw(), ADC_MAX);
    }

    #[test]
    fn test_calibrate_tracks_observed_range() {
        let mut s = sensor(20_000.0, 60_000.0);
        assert_eq!(s.observed_range(), None);
        for raw in [1500, 900, 5000, 1200] {
            s.calibrate(raw);
        }
        assert_eq!(s.observed_range(), Some((900, ADC_MAX)));
        // Warm-up samples do not replace the stored reading.
        assert_eq!(s.raw(), 0);
    }

    #[test]
    fn test_from_config_preserves_order() {
        let sensors = FlexSensor::from_config(&DEFAULT_CONFIG);
        let pins: [u8; FLEX_COUNT] = sensors.map(|s| s.pin());
        assert_eq!(pins, [36, 39, 32, 33, 26]);
        assert_eq!(sensors[1].calibration(), PER_SENSOR_CALIBRATION[1]);
    }
}
