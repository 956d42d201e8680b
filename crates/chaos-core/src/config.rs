//! Field configuration: the named parameters of the effect, grouped by concern.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, Rgba};

/// Built-in parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Purple field with a motion-trail fade, right-angle traces and a noise texture.
    #[default]
    Chaos,
    /// Sparse field cleared every frame, with straight traces and stray lines.
    Portfolio,
}

impl Preset {
    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            Preset::Chaos => Preset::Portfolio,
            Preset::Portfolio => Preset::Chaos,
        }
    }

    /// Get the display name for this preset.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Chaos => "chaos",
            Preset::Portfolio => "portfolio",
        }
    }

    /// The full parameter set for this preset.
    pub fn config(self) -> FieldConfig {
        match self {
            Preset::Chaos => FieldConfig::default(),
            Preset::Portfolio => FieldConfig::portfolio(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How each frame starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMode {
    /// Translucent fill, leaving fading trails of previous frames.
    #[default]
    Fade,
    /// Opaque fill, wiping the previous frame.
    Opaque,
}

/// Which route a spawned trace takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceShapeMode {
    /// Same right-angle route as the connector it was spawned from.
    #[default]
    Follow,
    /// Straight line between the endpoints.
    Direct,
}

/// When the noise texture is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseMode {
    /// Once, right after the field is first painted.
    #[default]
    Once,
    /// At the end of every frame.
    EveryFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub color: Rgb,
    /// Alpha of the per-frame fill in [`BackgroundMode::Fade`].
    pub opacity: f64,
    pub mode: BackgroundMode,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: Rgb::new(0x7f, 0x38, 0x7f),
            opacity: 0.05,
            mode: BackgroundMode::Fade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub color: Rgb,
    pub opacity: f64,
    pub width: f64,
    /// Opacity lost per frame.
    pub fade_speed: f64,
    /// Extra random fade per trace, `rand * fade_jitter` on top of `fade_speed`.
    pub fade_jitter: f64,
    /// Probability of spawning a trace per connector per frame.
    pub spawn_chance: f64,
    pub shape: TraceShapeMode,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            opacity: 0.8,
            width: 1.5,
            fade_speed: 0.02,
            fade_jitter: 0.0,
            spawn_chance: 0.05,
            shape: TraceShapeMode::Follow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub color: Rgb,
    pub opacity: f64,
    pub width: f64,
    /// Nodes closer than this are connected.
    pub distance: f64,
    /// Chance per frame that an unconnected node throws a stray line.
    pub stray_chance: f64,
    /// Full extent of the box a stray line may end in, centered on the node.
    pub stray_reach: f64,
    pub stray_opacity: f64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            opacity: 0.6,
            width: 0.8,
            distance: 150.0,
            stray_chance: 0.0,
            stray_reach: 1000.0,
            stray_opacity: 0.2,
        }
    }
}

/// Inclusive range of rings per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingCount {
    pub min: usize,
    pub max: usize,
}

/// On/off lengths of a dashed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashPattern {
    pub on: f64,
    pub off: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Viewport area per node; larger means fewer nodes.
    pub density: f64,
    pub min_count: usize,
    pub base_radius: f64,
    pub radius_variation: f64,
    pub center_color: Rgb,
    pub center_radius: f64,
    pub ring_color: Rgba,
    pub ring_count: RingCount,
    pub ring_spacing: f64,
    pub ring_width: f64,
    /// Angle covered by each ring arc, in radians.
    pub ring_sweep: f64,
    pub dash: DashPattern,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            density: 40_000.0,
            min_count: 8,
            base_radius: 5.0,
            radius_variation: 10.0,
            center_color: Rgb::new(0x1a, 0x11, 0x1a),
            center_radius: 2.0,
            ring_color: Rgb::new(26, 17, 26).alpha(0.6),
            ring_count: RingCount { min: 1, max: 3 },
            ring_spacing: 3.0,
            ring_width: 1.0,
            ring_sweep: PI * 1.5,
            dash: DashPattern { on: 2.0, off: 4.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Full range of horizontal speed, centered on zero.
    pub speed_x: f64,
    pub speed_y: f64,
    pub ring_rotation_speed: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed_x: 0.2,
            speed_y: 0.2,
            ring_rotation_speed: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub enabled: bool,
    /// Maximum brightness added to a noisy pixel.
    pub intensity: f64,
    /// A pixel gets noise when a uniform sample exceeds this; higher means fewer pixels.
    pub density: f64,
    pub mode: NoiseMode,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 30.0,
            density: 0.97,
            mode: NoiseMode::Once,
        }
    }
}

/// Every tunable parameter of the field. Read-only once a field is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub background: BackgroundConfig,
    pub trail: TrailConfig,
    pub connection: ConnectionConfig,
    pub node: NodeConfig,
    pub movement: MovementConfig,
    pub noise: NoiseConfig,
}

impl FieldConfig {
    fn portfolio() -> Self {
        let ink = Rgb::new(26, 17, 26);
        Self {
            background: BackgroundConfig {
                color: Rgb::new(0xf4, 0xf1, 0xea),
                opacity: 1.0,
                mode: BackgroundMode::Opaque,
            },
            trail: TrailConfig {
                color: ink,
                opacity: 0.3,
                width: 0.5,
                fade_speed: 0.005,
                fade_jitter: 0.01,
                spawn_chance: 0.01,
                shape: TraceShapeMode::Direct,
            },
            connection: ConnectionConfig {
                color: ink,
                stray_chance: 0.005,
                ..ConnectionConfig::default()
            },
            node: NodeConfig {
                density: 15_000.0,
                min_count: 0,
                center_color: ink,
                center_radius: 1.5,
                ring_color: ink.opaque(),
                ring_width: 0.5,
                ring_sweep: 4.0,
                ..NodeConfig::default()
            },
            movement: MovementConfig::default(),
            noise: NoiseConfig {
                enabled: false,
                ..NoiseConfig::default()
            },
        }
    }
}
