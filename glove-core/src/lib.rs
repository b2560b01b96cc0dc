//! Platform-agnostic logic of the sign-language glove.
//!
//! This crate holds everything that does not touch hardware: the flex sensor
//! model, telemetry framing, link state, transmit pacing, text layout, and the
//! application pipeline that ties them together. It can be used both in
//! embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`config`]: Compile-time board configuration ([`GloveConfig`], [`DEFAULT_CONFIG`])
//! - [`flex`]: Resistive sensor model ([`FlexSensor`])
//! - [`assembler`]: Frame assembly with fixed-point scaling ([`assemble`])
//! - [`scheduler`]: Minimum spacing between notifications ([`TransmitScheduler`])
//! - [`link`]: Connection state machine ([`ConnectionMachine`], [`LinkEvent`])
//! - [`text`]: Character-wrapped layout ([`render`], [`DisplayMessage`])
//! - [`button`]: Timestamp debouncing ([`Debouncer`])
//! - [`display`]: Screen layout on top of the [`Display`] trait
//! - [`input`] / [`output`]: Collaborator traits ([`ImuSource`], [`AnalogSource`], [`TelemetryLink`])
//! - [`app`]: The control loop as one context struct ([`GloveApp`])
//!
//! # Data Flow
//!
//! ```text
//! radio task --LinkEvent--> GloveApp::handle_event --> display / echo
//!
//! loop: GloveApp::poll(now, button)
//!         flex + IMU --> assemble --> TransmitScheduler --> TelemetryLink::notify
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and pipeline logging (for embedded use)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod app;
pub mod assembler;
pub mod button;
pub mod config;
pub mod display;
pub mod flex;
pub mod input;
pub mod link;
pub mod output;
pub mod scheduler;
pub mod text;

// Re-export main types at crate root
pub use app::{AppError, GloveApp, Phase};
pub use assembler::{assemble, FrameError, INERTIAL_SCALE};
pub use button::{Debouncer, ToggleEvent};
pub use config::{
    ConfigError, FlexChannel, GloveConfig, SensorCalibration, Timing, DEFAULT_CONFIG,
    DEFAULT_TIMING, IMU_ONLY_CONFIG, PER_SENSOR_CONFIG, SHARED_CONFIG,
};
pub use display::{Color, Display, FaultScreen, Spinner};
pub use flex::{map_range, FlexSensor};
pub use input::{AnalogSource, ImuSample, ImuSource, InputError};
pub use link::{ConnectionMachine, ConnectionState, Effect, LinkEvent, StatusIndicator, Step, TransitionError};
pub use output::{OutputError, TelemetryLink};
pub use scheduler::TransmitScheduler;
pub use text::{render, DisplayMessage, FontScale, TextSurface};

pub use glove_proto::{Axes, TelemetryFrame};
