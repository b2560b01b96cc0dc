//! GATT identifiers and advertising parameters.
//!
//! The glove exposes a single service with a single characteristic:
//!
//! - **Service**: `0000180d-0000-1000-8000-00805f9b34fb`
//! - **Characteristic**: `00002a37-0000-1000-8000-00805f9b34fb`
//!   - Notify: Device → App, one 22-byte [`TelemetryFrame`](crate::TelemetryFrame) per tick
//!   - Write: App → Device, arbitrary text, echoed back as the characteristic value

/// Name used in advertising and the GAP device name.
pub const DEVICE_NAME: &str = "Interpreter Glove";

/// Primary service UUID.
pub const SERVICE_UUID: &str = "0000180d-0000-1000-8000-00805f9b34fb";

/// Data characteristic UUID (write + notify).
pub const CHARACTERISTIC_UUID: &str = "00002a37-0000-1000-8000-00805f9b34fb";

/// 16-bit alias of [`SERVICE_UUID`] on the Bluetooth base UUID.
pub const SERVICE_UUID16: u16 = 0x180d;

/// Largest inbound write accepted (maximum ATT attribute value length).
pub const MAX_WRITE_LEN: usize = 512;

/// Preferred minimum connection interval hint, in 1.25 ms units.
pub const MIN_PREFERRED_INTERVAL: u16 = 0x06;

/// Preferred maximum connection interval hint, in 1.25 ms units.
pub const MAX_PREFERRED_INTERVAL: u16 = 0x12;
