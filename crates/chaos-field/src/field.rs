//! The field: nodes, connectors and traces drawn once per frame.

use chaos_core::{BackgroundMode, FieldConfig, NodeConfig, NoiseMode, TraceShapeMode};

use crate::node::Node;
use crate::noise;
use crate::random::RandomSource;
use crate::surface::{Path, Stroke, Surface};
use crate::trace::{Trace, TraceShape};

/// Number of nodes for a viewport: one per `density` square pixels, at least `min_count`.
pub fn node_count(width: f64, height: f64, config: &NodeConfig) -> usize {
    if config.density <= 0.0 {
        return config.min_count;
    }
    let derived = (width * height / config.density).floor();
    if !derived.is_finite() {
        return config.min_count;
    }
    (derived.max(0.0) as usize).max(config.min_count)
}

/// The animated field, drawing onto a surface `S` with randomness from `R`.
#[derive(Debug)]
pub struct Field<S, R> {
    config: FieldConfig,
    surface: S,
    rng: R,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    nodes: Vec<Node>,
    traces: Vec<Trace>,
    frame: u64,
}

impl<S: Surface, R: RandomSource> Field<S, R> {
    /// Create an empty field; call [`Field::start`] or [`Field::resize`] to populate it.
    pub fn new(config: FieldConfig, surface: S, rng: R) -> Self {
        Self {
            config,
            surface,
            rng,
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            nodes: Vec::new(),
            traces: Vec::new(),
            frame: 0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Frames stepped since the field was created.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Size the field, paint the background opaquely and lay down the initial noise.
    pub fn start(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.resize(width, height, pixel_ratio);

        let color = self.config.background.color.opaque();
        self.surface.fill_rect(0.0, 0.0, width, height, color);

        let noise = &self.config.noise;
        if noise.enabled && noise.mode == NoiseMode::Once {
            self.apply_noise();
        }
    }

    /// Start over at the current size with fresh nodes.
    pub fn restart(&mut self) {
        self.start(self.width, self.height, self.pixel_ratio);
    }

    /// Resize the viewport and rebuild every node; traces are dropped.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.surface.resize(width, height, pixel_ratio);

        let count = node_count(width, height, &self.config.node);
        self.nodes = (0..count)
            .map(|_| Node::spawn(width, height, &self.config, &mut self.rng))
            .collect();
        self.traces.clear();

        tracing::debug!(width, height, pixel_ratio, nodes = count, "field reset");
    }

    /// Advance and draw one frame.
    pub fn step(&mut self) {
        self.frame += 1;

        self.paint_background();
        self.step_traces();
        self.draw_connections();

        for node in &mut self.nodes {
            node.update(self.width, self.height);
            node.draw(&mut self.surface, &self.config);
        }

        let noise = &self.config.noise;
        if noise.enabled && noise.mode == NoiseMode::EveryFrame {
            self.apply_noise();
        }

        tracing::trace!(frame = self.frame, traces = self.traces.len(), "frame drawn");
    }

    /// Run the noise pass over the current surface contents.
    pub fn apply_noise(&mut self) {
        let mut image = self.surface.image_data();
        noise::apply_noise(&mut image, &self.config.noise, &mut self.rng);
        self.surface.put_image_data(&image);
    }

    fn paint_background(&mut self) {
        let background = &self.config.background;
        let color = match background.mode {
            BackgroundMode::Fade => background.color.alpha(background.opacity),
            BackgroundMode::Opaque => background.color.opaque(),
        };
        self.surface.fill_rect(0.0, 0.0, self.width, self.height, color);
    }

    fn step_traces(&mut self) {
        for trace in &mut self.traces {
            trace.update();
            trace.draw(&mut self.surface, &self.config);
        }
        self.traces.retain(Trace::is_alive);
    }

    /// Connect every close pair with a right-angle line, occasionally leaving a trace behind.
    fn draw_connections(&mut self) {
        let Self {
            config,
            surface,
            rng,
            nodes,
            traces,
            ..
        } = self;
        let connection = &config.connection;
        let trail = &config.trail;
        let link = Stroke::solid(connection.color.alpha(connection.opacity), connection.width);

        for (i, a) in nodes.iter().enumerate() {
            let from = a.position();
            let mut connected = false;

            for b in &nodes[i + 1..] {
                let to = b.position();
                if from.distance(to) >= connection.distance {
                    continue;
                }
                connected = true;

                let shape = if rng.coin() {
                    TraceShape::HorizontalVertical
                } else {
                    TraceShape::VerticalHorizontal
                };
                surface.stroke(&shape.route(from, to), &link);

                if rng.chance(trail.spawn_chance) {
                    let shape = match trail.shape {
                        TraceShapeMode::Follow => shape,
                        TraceShapeMode::Direct => TraceShape::Direct,
                    };
                    let fade = if trail.fade_jitter > 0.0 {
                        trail.fade_speed + rng.next_f64() * trail.fade_jitter
                    } else {
                        trail.fade_speed
                    };
                    traces.push(Trace::new(from, to, shape, fade));
                }
            }

            if !connected && connection.stray_chance > 0.0 && rng.chance(connection.stray_chance)
            {
                let reach = connection.stray_reach;
                let end_x = from.x + rng.signed(reach);
                let end_y = from.y + rng.signed(reach);
                surface.stroke(
                    &Path::new().move_to(from.x, from.y).line_to(end_x, end_y),
                    &Stroke::solid(
                        connection.color.alpha(connection.stray_opacity),
                        connection.width,
                    ),
                );
            }
        }
    }
}
