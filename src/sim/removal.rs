use glam::{Vec2, Vec3A};

use crate::{
    consts::removal::{OFF_TRACK_OFFSET, PARK_TOLERANCE, PULL_SPEED, PULL_Z_OFFSET},
    math,
    sim::{CarBody, Dof6, RemovalStage, Track, TrackSide},
};

/// Parking pose of a car being taken off the track, and the rates it is moved at
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestPose {
    pub pos: Dof6,
    pub vel: Dof6,
}

impl RestPose {
    /// Finds the parking spot next to the outermost segment on the car's side of the track
    /// and the rates that take the car there.
    ///
    /// The orientation is brought to the parking one over the same time as the lift.
    #[must_use]
    pub fn target(body: &CarBody, track: &dyn Track, dt: f32) -> Self {
        let mut trk_pos = body.trk_pos;
        let segment = track.segment(trk_pos.seg);

        let side = if trk_pos.to_right > segment.width / 2.0 {
            let mut seg = segment;
            while let Some(next) = seg.left_side {
                seg = track.segment(next);
            }
            trk_pos.seg = seg.id;
            trk_pos.to_left = -OFF_TRACK_OFFSET;
            TrackSide::Left
        } else {
            let mut seg = segment;
            while let Some(next) = seg.right_side {
                seg = track.segment(next);
            }
            trk_pos.seg = seg.id;
            trk_pos.to_right = -OFF_TRACK_OFFSET;
            TrackSide::Right
        };

        let xy = track.local_to_global(&trk_pos, side);
        let pos = Dof6 {
            lin: Vec3A::new(xy.x, xy.y, track.height(&trk_pos) + body.stat_gc_z),
            ang: Vec3A::new(0.0, 0.0, track.side_tangent_angle(&trk_pos)),
        };

        let current = body.dyn_gcg.pos;
        let lift = pos.lin.z + PULL_Z_OFFSET - current.lin.z;
        // a car already above the lift height turns in a single tick
        let travel_time = (lift / PULL_SPEED).max(dt);

        let delta = pos.ang - current.ang;
        let ang_vel = Vec3A::new(
            math::norm_pi_pi(delta.x),
            math::norm_pi_pi(delta.y),
            math::norm_pi_pi(delta.z),
        ) / travel_time;

        Self {
            pos,
            vel: Dof6 {
                lin: Vec3A::new(0.0, 0.0, PULL_SPEED),
                ang: ang_vel,
            },
        }
    }

    fn planar_offset(&self, body: &CarBody) -> Vec2 {
        Vec2::new(self.pos.lin.x, self.pos.lin.y) - body.pos_2d()
    }

    fn is_above_spot(&self, body: &CarBody) -> bool {
        let offset = self.planar_offset(body);
        offset.x.abs() < PARK_TOLERANCE && offset.y.abs() < PARK_TOLERANCE
    }

    /// Moves a withdrawing car for one tick and returns the stage it ends up in
    pub fn step(&mut self, stage: RemovalStage, body: &mut CarBody, dt: f32) -> RemovalStage {
        let next = match stage {
            RemovalStage::PullUp => {
                let pos = &mut body.dyn_gcg.pos;
                pos.lin.z += self.vel.lin.z * dt;
                pos.ang += self.vel.ang * dt;

                if pos.lin.z > self.pos.lin.z + PULL_Z_OFFSET {
                    RemovalStage::PullSide
                } else {
                    RemovalStage::PullUp
                }
            }
            RemovalStage::PullSide => {
                if self.is_above_spot(body) {
                    RemovalStage::PullDown
                } else {
                    // recomputed every tick, `dt` times the rate is lost in the
                    // low digits of large world coordinates
                    let offset = self.planar_offset(body);
                    let travel_time = offset.length() / PULL_SPEED;
                    self.vel.lin.x = offset.x / travel_time;
                    self.vel.lin.y = offset.y / travel_time;

                    let pos = &mut body.dyn_gcg.pos.lin;
                    pos.x += self.vel.lin.x * dt;
                    pos.y += self.vel.lin.y * dt;

                    if self.is_above_spot(body) {
                        RemovalStage::PullDown
                    } else {
                        RemovalStage::PullSide
                    }
                }
            }
            RemovalStage::PullDown => {
                let pos = &mut body.dyn_gcg.pos.lin;
                pos.z -= self.vel.lin.z * dt;

                if pos.z < self.pos.lin.z {
                    RemovalStage::Parked
                } else {
                    RemovalStage::PullDown
                }
            }
            RemovalStage::Active | RemovalStage::Parked => stage,
        };

        body.dyn_gc.pos = body.dyn_gcg.pos;
        next
    }
}
