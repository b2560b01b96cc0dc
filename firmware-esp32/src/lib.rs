//! Interpreter Glove firmware for the TTGO T-Display (ESP32).
//!
//! This crate provides the board implementations of the `glove-core`
//! collaborator traits: the ADC for the flex sensors, the MPU6050 over I²C,
//! the ST7789 screen, and the BLE link.

#![no_std]

#[cfg(any(
    all(feature = "calibration-per-sensor", feature = "calibration-shared"),
    all(feature = "calibration-per-sensor", feature = "imu-only"),
    all(feature = "calibration-shared", feature = "imu-only"),
))]
compile_error!("select exactly one of calibration-per-sensor, calibration-shared, imu-only");

// Re-export core types for convenience
pub use glove_core::{
    AnalogSource, AppError, ConnectionState, GloveApp, GloveConfig, ImuSample, ImuSource,
    InputError, LinkEvent, OutputError, TelemetryFrame, TelemetryLink,
};
pub use glove_proto::{DEVICE_NAME, FRAME_LEN};

pub mod ble;
pub mod flex_adc;
pub mod mpu6050;
pub mod tft;

pub use ble::{BleLink, LinkChannels};
pub use flex_adc::FlexAdc;
pub use mpu6050::Mpu6050;
pub use tft::{FrameDisplay, FRAME_BYTES, HEIGHT, WIDTH};

/// Configuration selected by Cargo feature.
#[cfg(feature = "calibration-shared")]
pub const CONFIG: GloveConfig = glove_core::SHARED_CONFIG;
#[cfg(feature = "imu-only")]
pub const CONFIG: GloveConfig = glove_core::IMU_ONLY_CONFIG;
#[cfg(not(any(feature = "calibration-shared", feature = "imu-only")))]
pub const CONFIG: GloveConfig = glove_core::PER_SENSOR_CONFIG;

/// Pins `main` wires to the button, the IMU bus, and the ADC channels.
pub const BUTTON_GPIO: u8 = 35;
pub const IMU_SDA_GPIO: u8 = 21;
pub const IMU_SCL_GPIO: u8 = 22;
pub const FLEX_GPIOS: [u8; glove_core::config::FLEX_COUNT] = [36, 39, 32, 33, 26];

// The selected configuration must describe the board `main` brings up.
const _: () = {
    assert!(CONFIG.button_pin == BUTTON_GPIO);
    assert!(CONFIG.imu_sda_pin == IMU_SDA_GPIO);
    assert!(CONFIG.imu_scl_pin == IMU_SCL_GPIO);
    let mut i = 0;
    while i < FLEX_GPIOS.len() {
        assert!(CONFIG.flex[i].pin == FLEX_GPIOS[i]);
        i += 1;
    }
};

/// Name of the selected configuration, for the boot log.
#[cfg(feature = "calibration-shared")]
pub const VARIANT: &str = "shared calibration";
#[cfg(feature = "imu-only")]
pub const VARIANT: &str = "IMU only";
#[cfg(not(any(feature = "calibration-shared", feature = "imu-only")))]
pub const VARIANT: &str = "per-sensor calibration";
