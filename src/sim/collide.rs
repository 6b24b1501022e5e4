use ahash::AHashMap;
use glam::{Vec2, Vec3A};

use super::{CarBody, CollisionFlags, StepContext};
use crate::consts::collision::{CAR_RESTITUTION, DAMAGE_PER_IMPACT_SPEED};

fn planar(v: Vec2) -> Vec3A {
    Vec3A::new(v.x, v.y, 0.0)
}

/// Car/car contact detection and response.
///
/// Only cars that are still being simulated are registered and handed to `collide`.
pub trait CarCollider {
    fn add_car(&mut self, index: usize, dimensions: Vec3A);

    fn remove_car(&mut self, index: usize);

    /// Resolves the contacts between `bodies` for this tick, setting their collision flags
    fn collide(&mut self, bodies: &mut [&mut CarBody], ctx: &StepContext);

    fn shutdown(&mut self) {}
}

/// Treats every car as a circle in the ground plane
#[derive(Clone, Debug, Default)]
pub struct CircleCollider {
    radii: AHashMap<usize, f32>,
}

impl CircleCollider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_registered(&self, index: usize) -> bool {
        self.radii.contains_key(&index)
    }

    #[must_use]
    pub fn num_cars(&self) -> usize {
        self.radii.len()
    }

    fn resolve(a: &mut CarBody, b: &mut CarBody, min_dist: f32, damage_factor: f32) {
        let delta = b.pos_2d() - a.pos_2d();
        let dist = delta.length();
        if dist >= min_dist {
            return;
        }

        let normal = if dist > 0.0 { delta / dist } else { Vec2::X };
        let push = normal * (min_dist - dist) / 2.0;
        a.dyn_gcg.pos.lin -= planar(push);
        b.dyn_gcg.pos.lin += planar(push);

        let rel_vel = Vec2::new(
            b.dyn_gcg.vel.lin.x - a.dyn_gcg.vel.lin.x,
            b.dyn_gcg.vel.lin.y - a.dyn_gcg.vel.lin.y,
        )
        .dot(normal);

        if rel_vel < 0.0 {
            // equal masses
            let impulse = normal * (-(1.0 + CAR_RESTITUTION) * rel_vel / 2.0);
            a.dyn_gcg.vel.lin -= planar(impulse);
            b.dyn_gcg.vel.lin += planar(impulse);

            let damage = -rel_vel * DAMAGE_PER_IMPACT_SPEED * damage_factor;
            a.damage += damage;
            b.damage += damage;
        }

        // pushed more than half of the way out
        let blocked = min_dist - dist > min_dist / 2.0;
        for body in [a, b] {
            body.collision |= CollisionFlags::Any as u8 | CollisionFlags::Car as u8;
            body.blocked |= blocked;
            body.sync_local_from_global();
        }
    }
}

impl CarCollider for CircleCollider {
    fn add_car(&mut self, index: usize, dimensions: Vec3A) {
        self.radii.insert(index, (dimensions.x + dimensions.y) / 4.0);
    }

    fn remove_car(&mut self, index: usize) {
        self.radii.remove(&index);
    }

    fn collide(&mut self, bodies: &mut [&mut CarBody], ctx: &StepContext) {
        for j in 1..bodies.len() {
            let (left, right) = bodies.split_at_mut(j);
            let b = &mut *right[0];
            let Some(&rb) = self.radii.get(&b.index) else {
                continue;
            };

            for a in left.iter_mut() {
                let Some(&ra) = self.radii.get(&a.index) else {
                    continue;
                };
                Self::resolve(a, b, ra + rb, ctx.config.damage_factor);
            }
        }
    }

    fn shutdown(&mut self) {
        self.radii.clear();
    }
}
