//! Core types shared by the chaos crates: colors, field configuration and presets.

mod color;
mod config;

pub use color::{ColorParseError, Rgb, Rgba};
pub use config::{
    BackgroundConfig, BackgroundMode, ConnectionConfig, DashPattern, FieldConfig,
    MovementConfig, NodeConfig, NoiseConfig, NoiseMode, Preset, RingCount, TraceShapeMode,
    TrailConfig,
};
