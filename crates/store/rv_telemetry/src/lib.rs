//! Decodes rosbridge telemetry into renderer-ready structures.
//!
//! This crate is the translation layer between the robot's JSON messages
//! and the renderer: serde definitions of the wire shapes, per-kind frame
//! decoders, the navigation status machine, the outbound command encoders,
//! and the [`TelemetryBridge`] dispatcher tying them together behind the
//! [`TelemetrySink`] output interface.

pub mod commands;
pub mod decoders;
pub mod ros;

mod bridge;
mod error;
mod kind;
mod nav_status;
mod sink;

pub use bridge::TelemetryBridge;
pub use decoders::image::ImageFrame;
pub use decoders::laser_scan::DecodedPoints;
pub use error::DecodeError;
pub use kind::MessageKind;
pub use nav_status::{GoalStatus, NavSignal, NavStatusMachine};
pub use sink::TelemetrySink;
