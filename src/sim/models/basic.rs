use arrayvec::ArrayVec;
use glam::{Vec2, Vec3A};

use super::{Axle, CarModels, Chassis, Engine, StepContext, Transmission, Wheel, Wing};
use crate::{
    consts::{AIR_DENSITY, AMBIENT_TEMP, GRAVITY, PRESSURE_SCALE_HEIGHT, SEA_LEVEL_PRESSURE},
    math,
    sim::{CarBody, FRONT_LEFT, FRONT_RIGHT, REAR_LEFT, REAR_RIGHT},
};

pub const MAX_GEARS: usize = 8;

/// Nominal tire pressure at ambient temperature (Pa)
const TIRE_PRESSURE: f32 = 180_000.0;
const ROLLING_RESISTANCE: f32 = 0.015;
/// Share of full-throttle fuel flow burnt at idle
const IDLE_BURN: f32 = 0.05;
const FREE_REV_RATE: f32 = 4.0;
const BRAKE_HEATING: f32 = 1e-6;
const BRAKE_COOLING: f32 = 0.1;
const TIRE_HEATING: f32 = 60.0;
const TIRE_TEMP_RATE: f32 = 0.5;
const TIRE_WEAR_RATE: f32 = 1e-7;
const TIRE_GRAIN_RATE: f32 = 0.01;

/// Parameters of the basic car models
#[derive(Clone, Debug)]
pub struct CarParams {
    /// Dry mass (kg)
    pub mass: f32,
    /// Length, width and height
    pub dimensions: Vec3A,
    pub wheelbase: f32,
    pub track_width: f32,
    pub wheel_radius: f32,
    /// Steer angle at full lock (rad)
    pub steer_lock: f32,
    /// Drag coefficient times frontal area
    pub drag_area: f32,
    /// Downforce coefficient times area of the front and rear wing
    pub wing_area: [f32; 2],
    pub max_torque: f32,
    pub idle_rads: f32,
    pub rev_limit_rads: f32,
    /// Fuel flow at full throttle (kg/s)
    pub fuel_flow: f32,
    /// Forward gears, first gear first
    pub gear_ratios: ArrayVec<f32, MAX_GEARS>,
    pub reverse_ratio: f32,
    pub final_drive: f32,
    pub max_brake_torque: f32,
    /// Share of the brake torque going to the front axle
    pub front_brake_bias: f32,
    pub tire_mu: f32,
    pub anti_roll: [f32; 2],
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            mass: 1000.0,
            dimensions: Vec3A::new(4.6, 1.9, 1.1),
            wheelbase: 2.7,
            track_width: 1.6,
            wheel_radius: 0.33,
            steer_lock: 0.35,
            drag_area: 0.7,
            wing_area: [0.5, 0.8],
            max_torque: 400.0,
            idle_rads: 100.0,
            rev_limit_rads: 800.0,
            fuel_flow: 0.05,
            gear_ratios: ArrayVec::from([3.2, 2.3, 1.8, 1.45, 1.2, 1.0, 0.88, 0.78]),
            reverse_ratio: -3.0,
            final_drive: 3.5,
            max_brake_torque: 3000.0,
            front_brake_bias: 0.6,
            tire_mu: 1.5,
            anti_roll: [5000.0, 3000.0],
        }
    }
}

impl CarModels {
    /// A simple point-mass car following a kinematic bicycle model
    #[must_use]
    pub fn basic(params: &CarParams) -> Self {
        Self {
            chassis: Box::new(BasicChassis::new(params)),
            engine: Box::new(BasicEngine::new(params)),
            transmission: Box::new(BasicTransmission::new(params)),
            wheels: [FRONT_RIGHT, FRONT_LEFT, REAR_RIGHT, REAR_LEFT]
                .map(|index| Box::new(BasicWheel::new(index, params)) as Box<dyn Wheel>),
            wings: [0, 1].map(|index| Box::new(BasicWing::new(index, params)) as Box<dyn Wing>),
            axles: [0, 1].map(|index| Box::new(BasicAxle::new(index, params)) as Box<dyn Axle>),
        }
    }
}

fn air_density(body: &CarBody) -> f32 {
    AIR_DENSITY * body.local_pressure / SEA_LEVEL_PRESSURE
}

/// Relative position of a wheel center
fn wheel_offset(index: usize, wheelbase: f32, track_width: f32) -> Vec3A {
    let x = if index < 2 { wheelbase } else { -wheelbase };
    // right wheels sit on even indices
    let y = if index % 2 == 0 { -track_width } else { track_width };
    Vec3A::new(x, y, 0.0) * 0.5
}

pub struct BasicChassis {
    mass: f32,
    dimensions: Vec3A,
    wheelbase: f32,
    track_width: f32,
    steer_lock: f32,
    drag_area: f32,
    max_brake_torque: f32,
    front_brake_bias: f32,
}

impl BasicChassis {
    #[must_use]
    pub fn new(params: &CarParams) -> Self {
        Self {
            mass: params.mass,
            dimensions: params.dimensions,
            wheelbase: params.wheelbase,
            track_width: params.track_width,
            steer_lock: params.steer_lock,
            drag_area: params.drag_area,
            max_brake_torque: params.max_brake_torque,
            front_brake_bias: params.front_brake_bias.clamp(0.0, 1.0),
        }
    }

    fn update_corners(&self, body: &mut CarBody) {
        let pos = body.dyn_gcg.pos.lin;
        let yaw = body.yaw();
        for (i, corner) in body.corners.iter_mut().enumerate() {
            let offset = wheel_offset(i, self.dimensions.x, self.dimensions.y);
            *corner = pos + math::car_to_world_2d(offset, yaw);
        }
    }
}

impl Chassis for BasicChassis {
    fn dimensions(&self) -> Vec3A {
        self.dimensions
    }

    fn update_atmosphere(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let altitude = body.dyn_gcg.pos.lin.z;
        body.local_pressure = SEA_LEVEL_PRESSURE * (-altitude / PRESSURE_SCALE_HEIGHT).exp();
    }

    fn update_steering(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let angle = body.controls.steer * self.steer_lock;
        body.wheels[FRONT_RIGHT].steer = angle;
        body.wheels[FRONT_LEFT].steer = angle;
        body.wheels[REAR_RIGHT].steer = 0.0;
        body.wheels[REAR_LEFT].steer = 0.0;
    }

    fn update_wheel_positions(&mut self, body: &mut CarBody, ctx: &StepContext) {
        let pos = body.dyn_gcg.pos.lin;
        let yaw = body.yaw();
        for (i, wheel) in body.wheels.iter_mut().enumerate() {
            let rel = wheel_offset(i, self.wheelbase, self.track_width);
            wheel.state.rel_pos = rel;
            wheel.world_pos = pos + math::car_to_world_2d(rel, yaw);
            wheel.state.seg = ctx
                .track
                .global_to_local(Vec2::new(wheel.world_pos.x, wheel.world_pos.y))
                .seg;
        }
    }

    fn update_brakes(&mut self, body: &mut CarBody, ctx: &StepContext) {
        let total = body.controls.brake * self.max_brake_torque;
        for (i, wheel) in body.wheels.iter_mut().enumerate() {
            let share = if i < 2 {
                self.front_brake_bias
            } else {
                1.0 - self.front_brake_bias
            };
            wheel.brake_torque = total * share / 2.0;

            let heat = wheel.brake_torque * wheel.state.spin_vel.abs() * BRAKE_HEATING;
            let temp = wheel.state.brake_temp;
            wheel.state.brake_temp = (temp + (heat - temp * BRAKE_COOLING) * ctx.dt).clamp(0.0, 1.0);
        }
    }

    fn update_aero(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let v = body.dyn_gc.vel.lin.x;
        let drag = -0.5 * air_density(body) * self.drag_area * v * v.abs();
        body.aero_force = Vec3A::new(drag, 0.0, 0.0);
    }

    fn integrate(&mut self, body: &mut CarBody, ctx: &StepContext) {
        let dt = ctx.dt;
        let mass = self.mass + body.fuel;

        let mut force = body.aero_force + body.wing_force[0] + body.wing_force[1];
        for wheel in &body.wheels {
            force += wheel.force;
        }

        let v0 = body.dyn_gc.vel.lin.x;
        let rolling = -ROLLING_RESISTANCE * mass * GRAVITY * v0.signum() * f32::from(v0 != 0.0);
        let accel_x = (force.x + rolling) / mass;

        let mut v1 = v0 + accel_x * dt;
        if v0 != 0.0 && v1.signum() != v0.signum() && body.engine_torque.abs() <= f32::EPSILON {
            // resistive forces alone never reverse the car
            v1 = 0.0;
        }
        let accel_x = (v1 - v0) / dt;

        let steer = (body.wheels[FRONT_RIGHT].steer + body.wheels[FRONT_LEFT].steer) / 2.0;
        let yaw_rate = v1 * steer.tan() / self.wheelbase;
        let yaw_acc = (yaw_rate - body.dyn_gcg.vel.ang.z) / dt;
        let yaw = math::norm_pi_pi(body.yaw() + yaw_rate * dt);

        let vel_world = math::car_to_world_2d(Vec3A::new(v1, 0.0, 0.0), yaw);
        let acc_world = math::car_to_world_2d(Vec3A::new(accel_x, v1 * yaw_rate, 0.0), yaw);

        let gcg = &mut body.dyn_gcg;
        gcg.pos.lin += vel_world * dt;
        gcg.pos.ang.z = yaw;
        gcg.vel.lin = vel_world;
        gcg.vel.ang = Vec3A::new(0.0, 0.0, yaw_rate);
        gcg.acc.lin = acc_world;
        gcg.acc.ang = Vec3A::new(0.0, 0.0, yaw_acc);

        body.trk_pos = ctx.track.global_to_local(body.pos_2d());
        body.dyn_gcg.pos.lin.z = ctx.track.height(&body.trk_pos) + body.stat_gc_z;

        body.sync_local_from_global();
    }

    fn update_post(&mut self, body: &mut CarBody, ctx: &StepContext) {
        body.trk_pos = ctx.track.global_to_local(body.pos_2d());
        self.update_corners(body);
    }
}

pub struct BasicEngine {
    max_torque: f32,
    idle_rads: f32,
    rev_limit_rads: f32,
    fuel_flow: f32,
    rads: f32,
}

impl BasicEngine {
    #[must_use]
    pub fn new(params: &CarParams) -> Self {
        Self {
            max_torque: params.max_torque,
            idle_rads: params.idle_rads,
            rev_limit_rads: params.rev_limit_rads.max(params.idle_rads),
            fuel_flow: params.fuel_flow,
            rads: params.idle_rads,
        }
    }
}

impl Engine for BasicEngine {
    fn update_torque(&mut self, body: &mut CarBody, ctx: &StepContext) {
        if body.fuel <= 0.0 {
            body.fuel = 0.0;
            body.engine_torque = 0.0;
            return;
        }

        let accel = if self.rads >= self.rev_limit_rads {
            0.0
        } else {
            body.controls.accel
        };
        body.engine_torque = accel * self.max_torque;

        let flow = self.fuel_flow * (IDLE_BURN + (1.0 - IDLE_BURN) * accel);
        body.fuel = (body.fuel - flow * ctx.dt * ctx.config.fuel_factor).max(0.0);
    }

    fn update_rpm(&mut self, body: &mut CarBody, axle_rads: f32, ctx: &StepContext) {
        let free_target = if body.fuel > 0.0 {
            self.idle_rads + body.controls.accel * (self.rev_limit_rads - self.idle_rads)
        } else {
            0.0
        };
        let free = self.rads + (free_target - self.rads) * (FREE_REV_RATE * ctx.dt).min(1.0);

        let transfer = if axle_rads == 0.0 { 0.0 } else { body.clutch_transfer };
        let coupled = axle_rads.abs().max(self.idle_rads);
        self.rads = (transfer * coupled + (1.0 - transfer) * free).clamp(0.0, self.rev_limit_rads);
    }

    fn rads(&self) -> f32 {
        self.rads
    }

    fn stop(&mut self) {
        self.rads = 0.0;
    }
}

pub struct BasicTransmission {
    gear_ratios: ArrayVec<f32, MAX_GEARS>,
    reverse_ratio: f32,
    final_drive: f32,
    gear: i32,
}

impl BasicTransmission {
    #[must_use]
    pub fn new(params: &CarParams) -> Self {
        Self {
            gear_ratios: params.gear_ratios.clone(),
            reverse_ratio: params.reverse_ratio,
            final_drive: params.final_drive,
            gear: 0,
        }
    }

    fn overall_ratio(&self) -> f32 {
        let ratio = match self.gear {
            0 => 0.0,
            -1 => self.reverse_ratio,
            g => self.gear_ratios[g as usize - 1],
        };
        ratio * self.final_drive
    }
}

impl Transmission for BasicTransmission {
    fn update_gearbox(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        self.gear = body.controls.gear.clamp(-1, self.gear_ratios.len() as i32);
    }

    fn update(&mut self, body: &mut CarBody, engine: &mut dyn Engine, ctx: &StepContext) {
        let ratio = self.overall_ratio();
        let wheel_torque = body.engine_torque * ratio * body.clutch_transfer / 2.0;

        body.wheels[FRONT_RIGHT].drive_torque = 0.0;
        body.wheels[FRONT_LEFT].drive_torque = 0.0;
        body.wheels[REAR_RIGHT].drive_torque = wheel_torque;
        body.wheels[REAR_LEFT].drive_torque = wheel_torque;

        let spin = (body.wheels[REAR_RIGHT].state.spin_vel + body.wheels[REAR_LEFT].state.spin_vel) / 2.0;
        engine.update_rpm(body, spin * ratio, ctx);
    }

    fn gear(&self) -> i32 {
        self.gear
    }

    fn set_neutral(&mut self) {
        self.gear = 0;
    }
}

pub struct BasicWheel {
    index: usize,
    radius: f32,
    mu: f32,
    static_load: f32,
}

impl BasicWheel {
    #[must_use]
    pub fn new(index: usize, params: &CarParams) -> Self {
        Self {
            index,
            radius: params.wheel_radius,
            mu: params.tire_mu,
            static_load: params.mass * GRAVITY / 4.0,
        }
    }
}

impl Wheel for BasicWheel {
    fn update_ride(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let axle = self.index / 2;
        let downforce = -body.wing_force[axle].z / 2.0;
        let wheel = &mut body.wheels[self.index];
        wheel.susp_travel = 0.0;
        wheel.load = (self.static_load + downforce).max(0.0);
    }

    fn update_force(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let v = body.dyn_gc.vel.lin.x;
        let wheel = &mut body.wheels[self.index];

        let grip = self.mu * (1.0 - 0.3 * wheel.state.wear) * (1.0 - 0.2 * wheel.state.graining);
        let limit = grip * wheel.load;

        let brake = if v == 0.0 { 0.0 } else { wheel.brake_torque * v.signum() };
        let demanded = (wheel.drive_torque - brake) / self.radius;
        let applied = demanded.clamp(-limit, limit);

        wheel.state.skid = if limit > 0.0 && demanded.abs() > limit {
            ((demanded.abs() - limit) / limit).min(1.0)
        } else {
            0.0
        };
        wheel.force = Vec3A::new(applied, 0.0, -wheel.load);
    }

    fn update_tire(&mut self, body: &mut CarBody, ctx: &StepContext) {
        let v = body.dyn_gc.vel.lin.x.abs();
        let tire_factor = ctx.config.tire_factor;
        let wheel = &mut body.wheels[self.index];
        let state = &mut wheel.state;

        let usage = if wheel.load > 0.0 {
            (wheel.force.x.abs() / (self.mu * wheel.load)).min(1.0)
        } else {
            0.0
        };
        let target = AMBIENT_TEMP + TIRE_HEATING * usage;
        state.temperature += (target - state.temperature) * (TIRE_TEMP_RATE * ctx.dt).min(1.0);
        state.pressure = TIRE_PRESSURE * (state.temperature + 273.15) / (AMBIENT_TEMP + 273.15);

        let wear = wheel.force.x.abs() * v * TIRE_WEAR_RATE * ctx.dt * tire_factor;
        state.wear = (state.wear + wear).clamp(0.0, 1.0);
        let grain = state.skid * TIRE_GRAIN_RATE * ctx.dt * tire_factor;
        state.graining = (state.graining + grain).clamp(0.0, 1.0);
    }

    fn update_rotation(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let v = body.dyn_gc.vel.lin.x;
        body.wheels[self.index].state.spin_vel = v / self.radius;
    }

    fn reset_wear(&mut self, body: &mut CarBody) {
        let state = &mut body.wheels[self.index].state;
        state.wear = 0.0;
        state.graining = 0.0;
    }

    fn configure(&mut self, body: &mut CarBody) {
        let state = &mut body.wheels[self.index].state;
        state.temperature = AMBIENT_TEMP;
        state.pressure = TIRE_PRESSURE;
        state.brake_temp = 0.0;
    }
}

pub struct BasicWing {
    index: usize,
    area: f32,
}

impl BasicWing {
    #[must_use]
    pub fn new(index: usize, params: &CarParams) -> Self {
        Self {
            index,
            area: params.wing_area[index],
        }
    }
}

impl Wing for BasicWing {
    fn update(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let v = body.dyn_gc.vel.lin.x;
        let q = 0.5 * air_density(body) * v * v;
        body.wing_force[self.index] = Vec3A::new(0.0, 0.0, -self.area * q);
    }
}

pub struct BasicAxle {
    index: usize,
    anti_roll: f32,
}

impl BasicAxle {
    #[must_use]
    pub fn new(index: usize, params: &CarParams) -> Self {
        Self {
            index,
            anti_roll: params.anti_roll[index],
        }
    }
}

impl Axle for BasicAxle {
    fn update(&mut self, body: &mut CarBody, _ctx: &StepContext) {
        let (right, left) = (self.index * 2, self.index * 2 + 1);
        let travel = body.wheels[left].susp_travel - body.wheels[right].susp_travel;
        let force = self.anti_roll * travel;

        body.axle_force[self.index] = force;
        body.wheels[right].load = (body.wheels[right].load + force).max(0.0);
        body.wheels[left].load = (body.wheels[left].load - force).max(0.0);
    }
}
