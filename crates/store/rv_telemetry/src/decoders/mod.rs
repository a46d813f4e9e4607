//! Per-message-kind decoders converting wire payloads into renderer-ready
//! structures. All pure: no I/O, no state.

pub mod compressed_image;
pub mod image;
pub mod laser_scan;
pub mod path;
