use glam::{Vec2, Vec3A};

use crate::{
    math,
    sim::{CarControls, CarElt, DynGc, TrackPos, WheelState},
};

pub const FRONT_RIGHT: usize = 0;
pub const FRONT_LEFT: usize = 1;
pub const REAR_RIGHT: usize = 2;
pub const REAR_LEFT: usize = 3;

/// Collision flag bits, combined into a `u8`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CollisionFlags {
    Any = 1,
    /// Hit the track or a barrier
    Scene = 1 << 1,
    Car = 1 << 2,
    /// Hard vertical contact with the ground
    Crash = 1 << 3,
}

/// Per-wheel data exchanged between the pipeline stages
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelBody {
    pub state: WheelState,
    /// Steer angle of the wheel (rad)
    pub steer: f32,
    /// Vertical load on the tire
    pub load: f32,
    pub susp_travel: f32,
    pub drive_torque: f32,
    pub brake_torque: f32,
    /// Tire force in the car frame
    pub force: Vec3A,
    /// Wheel center in the world frame
    pub world_pos: Vec3A,
}

/// The physical state of one car that the subsystem models read and write.
///
/// Anything private to a model (engine internals, tire model state, ...) stays
/// inside the model itself.
#[derive(Clone, Debug)]
pub struct CarBody {
    pub index: usize,
    /// Velocities in the car frame
    pub dyn_gc: DynGc,
    /// Velocities in the world frame
    pub dyn_gcg: DynGc,
    pub speed: f32,
    pub trk_pos: TrackPos,
    pub stat_gc_z: f32,
    /// Length, width and height of the body
    pub dimensions: Vec3A,
    pub fuel: f32,
    pub tank: f32,
    pub damage: f32,
    /// Sanitized driver commands for the current tick
    pub controls: CarControls,
    pub clutch_transfer: f32,
    pub engine_torque: f32,
    /// Body aerodynamic force in the car frame
    pub aero_force: Vec3A,
    /// Front and rear wing forces in the car frame
    pub wing_force: [Vec3A; 2],
    /// Anti-roll force of the front and rear axle
    pub axle_force: [f32; 2],
    pub wheels: [WheelBody; 4],
    pub corners: [Vec3A; 4],
    pub local_pressure: f32,
    /// Collision flags of the current tick
    pub collision: u8,
    pub blocked: bool,
}

impl CarBody {
    pub(crate) fn from_elt(elt: &CarElt, dimensions: Vec3A) -> Self {
        let mut wheels = [WheelBody::default(); 4];
        for (wheel, state) in wheels.iter_mut().zip(&elt.wheels) {
            wheel.state = *state;
        }

        Self {
            index: elt.index,
            dyn_gc: elt.dyn_gc,
            dyn_gcg: elt.dyn_gcg,
            speed: elt.speed,
            trk_pos: elt.trk_pos,
            stat_gc_z: elt.stat_gc_z,
            dimensions,
            fuel: elt.fuel.clamp(0.0, elt.tank.max(0.0)),
            tank: elt.tank.max(0.0),
            damage: elt.damage.max(0.0),
            controls: CarControls::DEFAULT,
            clutch_transfer: 1.0,
            engine_torque: 0.0,
            aero_force: Vec3A::ZERO,
            wing_force: [Vec3A::ZERO; 2],
            axle_force: [0.0; 2],
            wheels,
            corners: elt.corners,
            local_pressure: elt.local_pressure,
            collision: 0,
            blocked: false,
        }
    }

    /// True if the damage exceeds `max_damage`, a limit of 0 meaning none
    #[must_use]
    pub fn is_over_damage(&self, max_damage: f32) -> bool {
        max_damage > 0.0 && self.damage > max_damage
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.dyn_gcg.pos.ang.z
    }

    #[must_use]
    pub fn pos_2d(&self) -> Vec2 {
        Vec2::new(self.dyn_gcg.pos.lin.x, self.dyn_gcg.pos.lin.y)
    }

    /// Rebuilds the car-frame coordinates from the world-frame ones.
    ///
    /// Positions are shared, velocities and accelerations get rotated into the car frame.
    pub fn sync_local_from_global(&mut self) {
        let yaw = self.yaw();
        self.dyn_gc.pos = self.dyn_gcg.pos;
        self.dyn_gc.vel.lin = math::world_to_car_2d(self.dyn_gcg.vel.lin, yaw);
        self.dyn_gc.vel.ang = self.dyn_gcg.vel.ang;
        self.dyn_gc.acc.lin = math::world_to_car_2d(self.dyn_gcg.acc.lin, yaw);
        self.dyn_gc.acc.ang = self.dyn_gcg.acc.ang;
        self.speed = self.dyn_gcg.vel.lin.length();
    }

    /// Name of the first non-finite piece of state, if any
    #[must_use]
    pub fn first_non_finite(&self) -> Option<&'static str> {
        if let Some(field) = self.dyn_gcg.first_non_finite() {
            return Some(field);
        }
        if self.dyn_gc.first_non_finite().is_some() {
            return Some("car frame coordinates");
        }
        if !self.speed.is_finite() {
            return Some("speed");
        }
        if !self.fuel.is_finite() {
            return Some("fuel");
        }
        None
    }

    /// Clears everything that keeps a stopped car rolling or looking like it does
    pub(crate) fn clear_motion(&mut self) {
        self.dyn_gc.stop();
        self.dyn_gcg.stop();
        self.speed = 0.0;
        self.engine_torque = 0.0;
        self.collision = 0;
        for wheel in &mut self.wheels {
            wheel.state.skid = 0.0;
            wheel.state.spin_vel = 0.0;
            wheel.state.brake_temp = 0.0;
            wheel.drive_torque = 0.0;
            wheel.brake_torque = 0.0;
            wheel.force = Vec3A::ZERO;
        }
    }
}
