//! Headless rosbridge telemetry console for a robot.
//!
//! This crate provides the `roverview` binary that connects to a rosbridge
//! server over WebSocket, subscribes to the robot's sensor topics, decodes
//! them, and streams the results to the console in place of a renderer.

pub mod app;
pub mod cli;
pub mod console;
