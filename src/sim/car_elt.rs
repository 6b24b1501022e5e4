use glam::{Affine3A, Vec3A};

use crate::{
    math,
    sim::{CarControls, CarStatus, DynGc, PitCommand, SegmentId, TrackPos},
};

/// Per-wheel state published to the rest of the application
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelState {
    /// Wheel center relative to the car
    pub rel_pos: Vec3A,
    /// Track segment under the wheel
    pub seg: SegmentId,
    pub spin_vel: f32,
    pub brake_temp: f32,
    /// Skid mark intensity, [0, 1]
    pub skid: f32,
    /// Tire wear, [0, 1]
    pub wear: f32,
    pub temperature: f32,
    pub pressure: f32,
    /// Tire graining, [0, 1]
    pub graining: f32,
}

/// The public record of one car.
///
/// It is owned by the race manager; the simulation reads it once per tick and
/// writes its results back into it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarElt {
    /// Slot in the simulation's car table
    pub index: usize,
    pub status: CarStatus,
    /// Generalized coordinates, velocities in the car frame
    pub dyn_gc: DynGc,
    /// Generalized coordinates, velocities in the world frame
    pub dyn_gcg: DynGc,
    pub speed: f32,
    /// World transform of the car body
    pub pos_mat: Affine3A,
    pub trk_pos: TrackPos,
    /// Height of the center of gravity over the ground at rest
    pub stat_gc_z: f32,
    /// Written by the driver, sanitized in place by the simulation
    pub controls: CarControls,
    pub wheels: [WheelState; 4],
    /// Corners of the car body in world space
    pub corners: [Vec3A; 4],
    pub gear: i32,
    pub engine_rpm: f32,
    pub fuel: f32,
    /// Fuel tank capacity
    pub tank: f32,
    pub damage: f32,
    /// Collision flags accumulated since the race manager last cleared them
    pub collision: u8,
    /// Collision flags of the last tick
    pub sim_collision: u8,
    pub local_pressure: f32,
    pub pit_cmd: PitCommand,
}

impl Default for CarElt {
    fn default() -> Self {
        Self {
            index: 0,
            status: CarStatus::default(),
            dyn_gc: DynGc::ZERO,
            dyn_gcg: DynGc::ZERO,
            speed: 0.0,
            pos_mat: Affine3A::IDENTITY,
            trk_pos: TrackPos::default(),
            stat_gc_z: 0.0,
            controls: CarControls::DEFAULT,
            wheels: [WheelState::default(); 4],
            corners: [Vec3A::ZERO; 4],
            gear: 0,
            engine_rpm: 0.0,
            fuel: 0.0,
            tank: 0.0,
            damage: 0.0,
            collision: 0,
            sim_collision: 0,
            local_pressure: 0.0,
            pit_cmd: PitCommand::default(),
        }
    }
}

impl CarElt {
    /// Recomputes `pos_mat` from the current pose.
    ///
    /// The transform places the car body on the ground, `stat_gc_z` below the center of gravity.
    pub fn update_pos_mat(&mut self) {
        let mut pos = self.dyn_gc.pos.lin;
        pos.z -= self.stat_gc_z;
        self.pos_mat = math::coord_mat(pos, self.dyn_gc.pos.ang);
    }

    #[must_use]
    pub const fn pos(&self) -> Vec3A {
        self.dyn_gc.pos.lin
    }

    /// Longitudinal speed in the car frame
    #[must_use]
    pub fn speed_x(&self) -> f32 {
        self.dyn_gc.vel.lin.x
    }
}
