//! Rendering seam
//!
//! The game never talks to a graphics API directly. Each frame it walks the
//! physics world and emits lines, circles and text through a `DrawHelper`,
//! interpolating every entity's fly-in/fly-out transform by the current
//! transition alpha.

pub mod palette;
pub mod shapes;

use glam::Vec2;

use crate::consts::MAZE_CELL_SIZE;
use crate::world::{BoundingBox, Entity};
use palette::Color;

/// Draw target supplied by the platform layer
pub trait DrawHelper {
    fn draw_line(&mut self, a: Vec2, b: Vec2, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// `scale` is the glyph height in world units
    fn draw_text(&mut self, text: &str, position: Vec2, scale: f32, color: Color);
}

/// Draw every entity at animation progress `alpha`
pub fn render_world<D: DrawHelper + ?Sized>(entities: &[Entity], alpha: f32, draw: &mut D) {
    for entity in entities {
        shapes::entity(entity, alpha, draw);
    }
}

/// "Level N" in the top-left corner of the world box. Early levels have
/// small mazes, so the label shrinks with them.
pub fn render_hud<D: DrawHelper + ?Sized>(level: u32, world_box: BoundingBox, draw: &mut D) {
    let scale = if level < 5 {
        MAZE_CELL_SIZE / 4.0
    } else {
        MAZE_CELL_SIZE / 2.0
    };
    let position = Vec2::new(world_box.min.x, world_box.max.y);
    draw.draw_text(&format!("Level {}", level), position, scale, palette::TEXT);
}

/// Victory banner across the middle of the world box
pub fn render_victory<D: DrawHelper + ?Sized>(world_box: BoundingBox, draw: &mut D) {
    let position = Vec2::new(0.0, world_box.max.y / 2.0);
    draw.draw_text("YOU WIN!!!", position, 80.0, palette::TEXT);
}

/// Everything drawn, in order. Handy for tests and headless runs.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line { a: Vec2, b: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Text { text: String, position: Vec2, scale: f32, color: Color },
}

/// `DrawHelper` that records its calls
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl DrawHelper for Recorder {
    fn draw_line(&mut self, a: Vec2, b: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { a, b, color });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, scale: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            scale,
            color,
        });
    }
}
