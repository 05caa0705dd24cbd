//! Platform bridge
//!
//! The accelerometer runs on its own thread and the game thread reads the
//! latest reading each tick. Both halves of the gravity vector are packed
//! into one `AtomicU64` so a reader never sees x from one sample and y from
//! another.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

use crate::consts::EARTH_GRAVITY;

/// Gravity vector shared between the sensor thread and the game thread
#[derive(Debug, Clone, Default)]
pub struct SharedGravity(Arc<AtomicU64>);

impl SharedGravity {
    pub fn new(initial: Vec2) -> Self {
        let shared = Self::default();
        shared.store(initial);
        shared
    }

    fn pack(v: Vec2) -> u64 {
        ((v.x.to_bits() as u64) << 32) | v.y.to_bits() as u64
    }

    fn unpack(bits: u64) -> Vec2 {
        Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
    }

    /// Publish a new reading (sensor thread)
    pub fn store(&self, gravity: Vec2) {
        self.0.store(Self::pack(gravity), Ordering::Release);
    }

    /// Latest reading (game thread)
    pub fn load(&self) -> Vec2 {
        Self::unpack(self.0.load(Ordering::Acquire))
    }
}

/// Convert a raw accelerometer sample into game gravity.
///
/// The device's x/y tilt gives the direction; the z component scales the
/// strength down as the device lies flat.
pub fn sensor_gravity(x: f32, y: f32, z: f32, strength: f32) -> Vec2 {
    let Some(dir) = Vec2::new(-x, -y).try_normalize() else {
        return Vec2::ZERO;
    };
    let flatness = (1.0 - (z / EARTH_GRAVITY).abs()).abs().sqrt();
    dir * strength * flatness
}
