use std::fmt;

use log::{debug, error, info};

use super::{
    CarBody, CarElt, CarModels, CarStatus, ControlsContext, RacePhase, RemovalStage, RestPose,
    StepContext,
};
use crate::{
    consts::removal::STOP_SPEED,
    error::{SimError, SimResult},
};

/// The pipeline stages, in the order they run.
///
/// Used to tell which stage broke the car state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Atmosphere,
    Controls,
    Steering,
    Gearbox,
    EngineTorque,
    WheelPositions,
    Brakes,
    Aero,
    Wings,
    Ride,
    Axles,
    Tires,
    Transmission,
    WheelRotation,
    Integration,
    /// Engine idling before the start
    EngineRpm,
    Collision,
}

impl PipelineStage {
    const NAMES: [&'static str; 17] = [
        "atmosphere",
        "controls",
        "steering",
        "gearbox",
        "engine torque",
        "wheel positions",
        "brakes",
        "aero",
        "wings",
        "ride",
        "axles",
        "tires",
        "transmission",
        "wheel rotation",
        "integration",
        "engine rpm",
        "collision",
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check(body: &CarBody, stage: PipelineStage) -> SimResult<()> {
    match body.first_non_finite() {
        None => Ok(()),
        Some(field) => {
            error!("Car {}: non-finite {field} after the {stage} stage", body.index);
            Err(SimError::InvariantViolation {
                car: body.index,
                stage,
                field,
            })
        }
    }
}

/// A car inside the simulation: its physical state, its models and its parking pose
pub struct Car {
    pub(crate) body: CarBody,
    pub(crate) models: CarModels,
    pub(crate) rest: RestPose,
}

impl Car {
    pub(crate) fn new(elt: &CarElt, mut models: CarModels) -> Self {
        let mut body = CarBody::from_elt(elt, models.chassis.dimensions());
        for wheel in &mut models.wheels {
            wheel.configure(&mut body);
        }

        Self {
            body,
            models,
            rest: RestPose::default(),
        }
    }

    #[must_use]
    pub const fn body(&self) -> &CarBody {
        &self.body
    }

    #[must_use]
    pub const fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    /// True if the car has a reason to leave the race
    pub(crate) fn has_failed(&self, status: &CarStatus, max_damage: f32) -> bool {
        self.body.is_over_damage(max_damage)
            || self.body.fuel == 0.0
            || status.eliminated
            || status.retired
    }

    /// Marks why the car failed and starts its withdrawal once it has slowed down.
    ///
    /// Returns true if the car is now withdrawing.
    pub(crate) fn begin_removal(&mut self, elt: &mut CarElt, max_damage: f32, ctx: &StepContext) -> bool {
        let index = self.body.index;
        let status = &mut elt.status;
        if self.body.is_over_damage(max_damage) {
            if !status.broken {
                info!("Car {index} is broken ({:.1} damage)", self.body.damage);
            }
            status.broken = true;
        } else if self.body.fuel == 0.0 && !status.eliminated && !status.retired {
            if !status.out_of_fuel {
                info!("Car {index} ran out of fuel");
            }
            status.out_of_fuel = true;
        }

        self.models.transmission.set_neutral();
        self.models.engine.stop();
        elt.gear = 0;
        elt.engine_rpm = 0.0;

        if self.body.dyn_gc.vel.lin.x.abs() > STOP_SPEED {
            return false;
        }

        self.body.clear_motion();
        elt.collision = 0;
        elt.sim_collision = 0;
        self.rest = RestPose::target(&self.body, ctx.track, ctx.dt);
        status.removal = RemovalStage::PullUp;
        info!(
            "Car {index} is being taken off the track to ({:.1}, {:.1})",
            self.rest.pos.lin.x, self.rest.pos.lin.y
        );
        true
    }

    /// Runs one tick of the withdrawal animation
    pub(crate) fn step_removal(&mut self, elt: &mut CarElt, dt: f32) {
        let stage = elt.status.removal;
        let next = self.rest.step(stage, &mut self.body, dt);
        if next != stage {
            debug!("Car {}: {} -> {}", self.body.index, stage.name(), next.name());
            elt.status.removal = next;
        }
    }

    /// Runs every subsystem model in order, checking the car state after each stage
    pub(crate) fn update(&mut self, elt: &mut CarElt, ctx: &StepContext) -> SimResult<()> {
        use PipelineStage as Stage;

        let Self { body, models, .. } = self;

        if ctx.phase.is_pre_start() {
            elt.controls.gear = 0;
        }

        models.chassis.update_atmosphere(body, ctx);
        check(body, Stage::Atmosphere)?;

        let segment_width = ctx.track.segment(body.trk_pos.seg).width;
        let controls = elt.controls.sanitize(&ControlsContext {
            status: elt.status,
            to_right: body.trk_pos.to_right,
            segment_width,
            speed_x: body.dyn_gc.vel.lin.x,
        });
        elt.controls = controls;
        body.controls = controls;
        body.clutch_transfer = controls.clutch_transfer();
        check(body, Stage::Controls)?;

        models.chassis.update_steering(body, ctx);
        check(body, Stage::Steering)?;
        models.transmission.update_gearbox(body, ctx);
        check(body, Stage::Gearbox)?;
        models.engine.update_torque(body, ctx);
        check(body, Stage::EngineTorque)?;

        if ctx.phase.is_pre_start() {
            models.engine.update_rpm(body, 0.0, ctx);
            return check(body, Stage::EngineRpm);
        }

        models.chassis.update_wheel_positions(body, ctx);
        check(body, Stage::WheelPositions)?;
        models.chassis.update_brakes(body, ctx);
        check(body, Stage::Brakes)?;
        models.chassis.update_aero(body, ctx);
        check(body, Stage::Aero)?;

        for wing in &mut models.wings {
            wing.update(body, ctx);
        }
        check(body, Stage::Wings)?;

        for wheel in &mut models.wheels {
            wheel.update_ride(body, ctx);
        }
        check(body, Stage::Ride)?;

        for axle in &mut models.axles {
            axle.update(body, ctx);
        }
        check(body, Stage::Axles)?;

        for wheel in &mut models.wheels {
            wheel.update_force(body, ctx);
            wheel.update_tire(body, ctx);
            if ctx.phase == RacePhase::PreSimulation {
                wheel.reset_wear(body);
            }
        }
        check(body, Stage::Tires)?;

        models.transmission.update(body, models.engine.as_mut(), ctx);
        check(body, Stage::Transmission)?;

        for wheel in &mut models.wheels {
            wheel.update_rotation(body, ctx);
        }
        check(body, Stage::WheelRotation)?;

        models.chassis.integrate(body, ctx);
        check(body, Stage::Integration)
    }

    pub(crate) fn check(&self, stage: PipelineStage) -> SimResult<()> {
        check(&self.body, stage)
    }

    /// Publishes the car state into its public record
    pub(crate) fn commit(&self, elt: &mut CarElt) {
        let body = &self.body;

        elt.dyn_gc = body.dyn_gc;
        elt.dyn_gcg = body.dyn_gcg;
        elt.speed = body.speed;
        elt.trk_pos = body.trk_pos;
        for (state, wheel) in elt.wheels.iter_mut().zip(&body.wheels) {
            *state = wheel.state;
        }
        elt.corners = body.corners;
        elt.gear = self.models.transmission.gear();
        elt.engine_rpm = self.models.engine.rads();
        elt.fuel = body.fuel;
        elt.collision |= body.collision;
        elt.sim_collision = body.collision;
        elt.damage = body.damage;
        elt.local_pressure = body.local_pressure;
        elt.update_pos_mat();
    }

    pub(crate) fn shutdown(&mut self) {
        self.models.engine.shutdown();
    }
}
