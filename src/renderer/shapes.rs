//! Per-entity draw calls
//!
//! Every point goes through the entity's render transform, pivoting on the
//! entity position, so whole shapes spin and shrink in place during fly-in
//! and fly-out.

use glam::Vec2;

use super::DrawHelper;
use super::palette::Color;
use crate::world::{Entity, EntityKind, Queen, Transform, Worm};

/// Closed polygon outline
pub fn polygon<D: DrawHelper + ?Sized>(points: &[Vec2], color: Color, draw: &mut D) {
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        draw.draw_line(a, b, color);
    }
}

/// Worm head plus its trail, thinning toward the tail
fn worm<D: DrawHelper + ?Sized>(entity: &Entity, state: &Worm, t: &Transform, draw: &mut D) {
    let radius = entity.radius * t.scale;
    draw.draw_circle(t.apply(entity.position, entity.position), radius, entity.color);

    let len = state.trail_len() as f32;
    for (i, &body) in state.trail().enumerate() {
        let scale = i as f32 / len;
        draw.draw_circle(t.apply(entity.position, body), radius * scale, entity.color);
    }
}

/// Concentric rings, innermost first
fn queen<D: DrawHelper + ?Sized>(entity: &Entity, state: &Queen, t: &Transform, draw: &mut D) {
    let center = t.apply(entity.position, entity.position);
    let rings = state.rings();
    let span = rings.saturating_sub(1).max(1) as f32;
    for i in 0..rings {
        let scale = i as f32 / span;
        draw.draw_circle(center, entity.radius * t.scale * scale, state.ring_color(i));
    }
}

/// Draw one entity at animation progress `alpha`
pub fn entity<D: DrawHelper + ?Sized>(entity: &Entity, alpha: f32, draw: &mut D) {
    let t = entity.render_transform(alpha);
    let pivot = entity.position;
    match &entity.kind {
        EntityKind::Wall(seg) => {
            draw.draw_line(t.apply(pivot, seg.a), t.apply(pivot, seg.b), entity.color);
        }
        EntityKind::Ball => {
            draw.draw_circle(t.apply(pivot, pivot), entity.radius * t.scale, entity.color);
        }
        EntityKind::GoodBlock(_) | EntityKind::EvilBlock(_) => {
            let points: Vec<Vec2> = entity
                .world_shape()
                .unwrap_or_default()
                .into_iter()
                .map(|p| t.apply(pivot, p))
                .collect();
            polygon(&points, entity.color, draw);
        }
        EntityKind::Worm(state) => worm(entity, state, &t, draw),
        EntityKind::Queen(state) => queen(entity, state, &t, draw),
    }
}
