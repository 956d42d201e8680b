//! The animated node field.
//!
//! A [`Field`] owns a set of drifting [`Node`]s, draws right-angle connectors
//! between nodes that come close to each other, spawns fading [`Trace`]s along
//! some of those connectors and optionally sprinkles a noise texture over the
//! result. All drawing goes through the [`Surface`] trait; [`PixelCanvas`]
//! rasterizes into an RGBA buffer and [`RecordingSurface`] keeps a log of draw
//! commands. Randomness comes from an injected [`RandomSource`] so a seeded
//! generator reproduces a run exactly.

mod canvas;
mod field;
mod node;
mod noise;
mod random;
mod record;
mod surface;
mod trace;

pub use canvas::PixelCanvas;
pub use field::{Field, node_count};
pub use node::{Node, Ring};
pub use noise::apply_noise;
pub use random::{RandomSource, RngSource, StdRandom};
pub use record::{DrawCommand, RecordingSurface};
pub use surface::{ImageData, Path, Point, Segment, Stroke, Surface};
pub use trace::{Trace, TraceShape};
