//! Capability traits for the per-car subsystem models.
//!
//! Each model owns its private state and touches the shared [`CarBody`] only
//! through these update calls. The pipeline calls them in a fixed order every
//! tick, see [`Car::update`](crate::sim::Car).

mod basic;

pub use basic::*;

use glam::Vec3A;

use crate::sim::{CarBody, RacePhase, SimConfig, Track};

/// Everything a model may look at besides the car itself
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    /// Tick length (s)
    pub dt: f32,
    pub phase: RacePhase,
    pub track: &'a dyn Track,
    pub config: &'a SimConfig,
}

/// Car-level models: environment, steering, brakes, body aero and body motion
pub trait Chassis {
    /// Length, width and height of the body
    fn dimensions(&self) -> Vec3A;

    fn update_atmosphere(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_steering(&mut self, body: &mut CarBody, ctx: &StepContext);

    /// Places the wheels in the world from the current body pose
    fn update_wheel_positions(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_brakes(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_aero(&mut self, body: &mut CarBody, ctx: &StepContext);

    /// Integrates the body forces into the generalized coordinates and the track position
    fn integrate(&mut self, body: &mut CarBody, ctx: &StepContext);

    /// Runs after the collision pass, before the state is published
    fn update_post(&mut self, _body: &mut CarBody, _ctx: &StepContext) {}

    fn reconfigure_steering(&mut self, _body: &mut CarBody) {}

    fn reconfigure_brakes(&mut self, _body: &mut CarBody) {}
}

pub trait Engine {
    /// Computes the torque for this tick and burns the fuel it needs
    fn update_torque(&mut self, body: &mut CarBody, ctx: &StepContext);

    /// Updates the engine speed given the speed of the drive axle
    fn update_rpm(&mut self, body: &mut CarBody, axle_rads: f32, ctx: &StepContext);

    /// Engine speed (rad/s)
    fn rads(&self) -> f32;

    /// Stops the engine dead
    fn stop(&mut self);

    fn shutdown(&mut self) {}
}

pub trait Transmission {
    fn update_gearbox(&mut self, body: &mut CarBody, ctx: &StepContext);

    /// Sends the engine torque to the wheels and feeds the axle speed back into the engine
    fn update(&mut self, body: &mut CarBody, engine: &mut dyn Engine, ctx: &StepContext);

    fn gear(&self) -> i32;

    fn set_neutral(&mut self);

    fn reconfigure(&mut self, _body: &mut CarBody) {}
}

/// One wheel with its suspension, tire and brake disc
pub trait Wheel {
    fn update_ride(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_force(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_tire(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn update_rotation(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn reset_wear(&mut self, body: &mut CarBody);

    /// Sets up the wheel state when the car joins the simulation
    fn configure(&mut self, _body: &mut CarBody) {}

    fn reconfigure(&mut self, _body: &mut CarBody) {}
}

pub trait Wing {
    fn update(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn reconfigure(&mut self, _body: &mut CarBody) {}
}

pub trait Axle {
    fn update(&mut self, body: &mut CarBody, ctx: &StepContext);

    fn reconfigure(&mut self, _body: &mut CarBody) {}
}

/// The full set of models driving one car
pub struct CarModels {
    pub chassis: Box<dyn Chassis>,
    pub engine: Box<dyn Engine>,
    pub transmission: Box<dyn Transmission>,
    /// Front right, front left, rear right, rear left
    pub wheels: [Box<dyn Wheel>; 4],
    /// Front, rear
    pub wings: [Box<dyn Wing>; 2],
    /// Front, rear
    pub axles: [Box<dyn Axle>; 2],
}
