//! Drifting nodes with rotating ring ornaments.

use std::f64::consts::TAU;

use chaos_core::FieldConfig;

use crate::random::RandomSource;
use crate::surface::{Path, Point, Stroke, Surface};

/// A partial ring drawn around a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Added to the node's base radius.
    pub offset: f64,
    /// Start angle of the arc, in radians.
    pub phase: f64,
    /// Radians added to `phase` per frame.
    pub speed: f64,
    pub dashed: bool,
}

/// A moving point in the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub base_radius: f64,
    pub rings: Vec<Ring>,
}

impl Node {
    /// Place a node at a random spot in a `width × height` viewport.
    pub fn spawn(
        width: f64,
        height: f64,
        config: &FieldConfig,
        rng: &mut impl RandomSource,
    ) -> Self {
        let node = &config.node;
        let movement = &config.movement;

        let x = rng.next_f64() * width;
        let y = rng.next_f64() * height;
        let base_radius = rng.next_f64() * node.radius_variation + node.base_radius;

        let (min, max) = (
            node.ring_count.min,
            node.ring_count.max.max(node.ring_count.min),
        );
        let ring_count =
            ((rng.next_f64() * (max - min + 1) as f64).floor() as usize + min).min(max);
        let rings = (0..ring_count)
            .map(|i| Ring {
                offset: i as f64 * node.ring_spacing,
                phase: rng.next_f64() * TAU,
                speed: rng.signed(movement.ring_rotation_speed),
                dashed: rng.coin(),
            })
            .collect();

        let vx = rng.signed(movement.speed_x);
        let vy = rng.signed(movement.speed_y);

        Self {
            x,
            y,
            vx,
            vy,
            base_radius,
            rings,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Advance one frame, bouncing off the viewport edges.
    ///
    /// The velocity flips once the node has crossed an edge, so a node may sit
    /// up to one step outside the viewport for a single frame.
    pub fn update(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }

        for ring in &mut self.rings {
            ring.phase += ring.speed;
        }
    }

    pub fn draw(&self, surface: &mut impl Surface, config: &FieldConfig) {
        let node = &config.node;
        surface.fill(
            &Path::circle(self.x, self.y, node.center_radius),
            node.center_color.opaque(),
        );

        for ring in &self.rings {
            let path = Path::new().arc(
                self.x,
                self.y,
                self.base_radius + ring.offset,
                ring.phase,
                ring.phase + node.ring_sweep,
            );
            let stroke = if ring.dashed {
                Stroke::dashed(node.ring_color, node.ring_width, node.dash)
            } else {
                Stroke::solid(node.ring_color, node.ring_width)
            };
            surface.stroke(&path, &stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Script, StdRandom};
    use crate::record::{DrawCommand, RecordingSurface};
    use crate::surface::Segment;
    use approx::assert_relative_eq;
    use chaos_core::RingCount;

    fn still_node(x: f64, y: f64, vx: f64, vy: f64) -> Node {
        Node {
            x,
            y,
            vx,
            vy,
            base_radius: 5.0,
            rings: Vec::new(),
        }
    }

    #[test]
    fn test_spawn_draw_order() {
        let config = FieldConfig::default();
        // x, y, radius, ring count, (phase, speed, dash) per ring, vx, vy
        let mut rng = Script::new(&[
            0.5, 0.25, 0.5, 0.4, 0.0, 1.0, 0.9, 0.5, 0.0, 0.2, 0.75, 0.25,
        ]);
        let node = Node::spawn(800.0, 600.0, &config, &mut rng);

        assert_eq!(node.x, 400.0);
        assert_eq!(node.y, 150.0);
        assert_eq!(node.base_radius, 10.0);
        assert_eq!(node.rings.len(), 2);

        let first = &node.rings[0];
        assert_eq!(first.offset, 0.0);
        assert_eq!(first.phase, 0.0);
        assert_relative_eq!(first.speed, 0.025);
        assert!(first.dashed);

        let second = &node.rings[1];
        assert_eq!(second.offset, 3.0);
        assert_relative_eq!(second.phase, TAU / 2.0);
        assert_relative_eq!(second.speed, -0.025);
        assert!(!second.dashed);

        assert_relative_eq!(node.vx, 0.05);
        assert_relative_eq!(node.vy, -0.05);
    }

    #[test]
    fn test_ring_count_within_configured_range() {
        let mut config = FieldConfig::default();
        config.node.ring_count = RingCount { min: 1, max: 3 };
        let mut rng = StdRandom::seeded(7);
        for _ in 0..500 {
            let node = Node::spawn(100.0, 100.0, &config, &mut rng);
            assert!((1..=3).contains(&node.rings.len()));
            assert!((0.0..=100.0).contains(&node.x));
            assert!((5.0..15.0).contains(&node.base_radius));
            assert!(node.vx.abs() <= 0.1 && node.vy.abs() <= 0.1);
        }

        // A sample just below 1.0 picks the largest count.
        let node = Node::spawn(10.0, 10.0, &config, &mut Script::constant(0.999_999_999));
        assert_eq!(node.rings.len(), 3);
    }

    #[test]
    fn test_reflects_at_right_edge() {
        let mut node = still_node(100.0, 50.0, 0.1, 0.0);
        node.update(100.0, 100.0);
        assert!(node.vx < 0.0);
        assert_relative_eq!(node.x, 100.1);

        node.update(100.0, 100.0);
        assert!(node.x <= 100.0);
        assert!(node.vx < 0.0);
    }

    #[test]
    fn test_reflects_at_top_edge() {
        let mut node = still_node(50.0, 0.05, 0.0, -0.1);
        node.update(100.0, 100.0);
        assert!(node.vy > 0.0);
    }

    #[test]
    fn test_stays_within_one_step_of_viewport() {
        let config = FieldConfig::default();
        let mut rng = StdRandom::seeded(11);
        let (w, h) = (320.0, 200.0);
        let mut nodes: Vec<Node> = (0..20)
            .map(|_| Node::spawn(w, h, &config, &mut rng))
            .collect();
        for _ in 0..20_000 {
            for node in &mut nodes {
                node.update(w, h);
                let (sx, sy) = (node.vx.abs() + 1e-9, node.vy.abs() + 1e-9);
                assert!(node.x >= -sx && node.x <= w + sx, "x = {}", node.x);
                assert!(node.y >= -sy && node.y <= h + sy, "y = {}", node.y);
            }
        }
    }

    #[test]
    fn test_update_rotates_rings() {
        let mut node = still_node(10.0, 10.0, 0.0, 0.0);
        node.rings.push(Ring {
            offset: 0.0,
            phase: 1.0,
            speed: 0.02,
            dashed: false,
        });
        for _ in 0..10 {
            node.update(20.0, 20.0);
        }
        assert_relative_eq!(node.rings[0].phase, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_draw_dot_then_rings() {
        let config = FieldConfig::default();
        let mut node = still_node(30.0, 40.0, 0.0, 0.0);
        node.rings = vec![
            Ring {
                offset: 0.0,
                phase: 0.5,
                speed: 0.0,
                dashed: true,
            },
            Ring {
                offset: 3.0,
                phase: 1.0,
                speed: 0.0,
                dashed: false,
            },
        ];

        let mut surface = RecordingSurface::new();
        node.draw(&mut surface, &config);
        let commands = surface.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::Fill(_, c) if c == config.node.center_color.opaque()));

        let DrawCommand::Stroke(path, stroke) = &commands[1] else {
            panic!("expected ring stroke, got {:?}", commands[1]);
        };
        assert_eq!(stroke.dash, Some(config.node.dash));
        assert_eq!(
            path.segments(),
            &[Segment::Arc {
                center: Point::new(30.0, 40.0),
                radius: 5.0,
                start: 0.5,
                end: 0.5 + config.node.ring_sweep,
            }]
        );

        let DrawCommand::Stroke(path, stroke) = &commands[2] else {
            panic!("expected ring stroke, got {:?}", commands[2]);
        };
        assert_eq!(stroke.dash, None);
        assert!(matches!(path.segments()[0], Segment::Arc { radius, .. } if radius == 8.0));
    }
}
