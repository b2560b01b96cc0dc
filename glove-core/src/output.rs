//! Wireless link trait and error types.

use core::future::Future;
use glove_proto::TelemetryFrame;

/// Error type for link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Radio/stack I/O error, or a payload the stack cannot carry.
    Io,
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "link I/O error"),
        }
    }
}

/// Async trait for the wireless link collaborator.
///
/// The link owns service registration and the notify transport; the
/// application only decides *when* to advertise, notify, or echo.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait TelemetryLink {
    /// (Re)start advertising so a central can discover the glove.
    fn start_advertising(&mut self) -> impl Future<Output = Result<(), OutputError>>;

    /// Push one frame to the connected central.
    fn notify(&mut self, frame: &TelemetryFrame) -> impl Future<Output = Result<(), OutputError>>;

    /// Set the characteristic value to the bytes just written, acknowledging them.
    fn echo(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), OutputError>>;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(OutputError::Io.to_string(), "link I/O error");
    }
}
