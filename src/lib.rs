//! Voxel world → spatial engine bridge: chunk lifecycle tracking,
//! classification encoding, and the event router tying them together.
#![forbid(unsafe_code)]

pub mod bridge;
pub mod commands;

pub use bridge::NavBridge;
pub use commands::CommandSink;
