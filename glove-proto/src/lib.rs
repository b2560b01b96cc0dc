//! Wire format and identifiers shared by the glove firmware and its companion app.
//!
//! This crate provides everything needed to produce or consume the glove's
//! telemetry stream:
//!
//! - **Types**: [`TelemetryFrame`] and its inertial [`Axes`]
//! - **Encoding**: [`TelemetryFrame::to_bytes()`], [`TelemetryFrame::encode()`],
//!   and [`TelemetryFrame::decode()`]
//! - **Identifiers**: the GATT service/characteristic UUIDs and the advertised
//!   device name ([`gatt`])
//! - **Diagnostics**: the line-oriented serial rendering of a frame
//!   ([`write_frame_line()`])
//!
//! # Frame Layout
//!
//! A frame is exactly 22 bytes: eleven little-endian `i16` fields.
//!
//! ```text
//! [angle0, angle1, angle2, angle3, angle4, gyroX, gyroY, gyroZ, accelX, accelY, accelZ]
//! ```
//!
//! - `angleN` - bend angle of finger N in whole degrees
//! - `gyro*` - angular rate in rad/s, multiplied by 100
//! - `accel*` - acceleration in m/s², multiplied by 100
//!
//! # Example
//!
//! ```
//! use glove_proto::{Axes, TelemetryFrame, FRAME_LEN};
//!
//! let frame = TelemetryFrame {
//!     angles: [10, 20, 30, 40, 50],
//!     gyro: Axes::new(1, -2, 3),
//!     accel: Axes::new(-981, 5, 12),
//! };
//!
//! let bytes = frame.to_bytes();
//! assert_eq!(bytes.len(), FRAME_LEN);
//! assert_eq!(&bytes[..2], &10i16.to_le_bytes());
//! assert_eq!(TelemetryFrame::decode(&bytes), Ok(frame));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`heapless`**: Enable [`TelemetryFrame::diagnostic_line()`]
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod format;
pub mod frame;
pub mod gatt;

pub use format::{write_centi, write_frame_line, write_i16, MAX_FRAME_LINE_LEN};
pub use frame::{
    Axes, DecodeError, SerializeError, TelemetryFrame, ANGLE_SLOTS, FRAME_FIELDS, FRAME_LEN,
};
pub use gatt::{CHARACTERISTIC_UUID, DEVICE_NAME, SERVICE_UUID};
