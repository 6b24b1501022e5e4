#![allow(dead_code)]

use std::{cell::RefCell, io, rc::Rc};

use glam::{Vec2, Vec3A};
use racesim::sim::{
    CarBody, CarCollider, CarElt, CarModels, CircleCollider, DynGc, RacePhase, SimConfig,
    Simulation, Situation, StepContext, StraightTrack, TelemetryRecord, TelemetrySink, Track,
    models::CarParams,
};

pub const DT: f32 = 0.02;
pub const TRACK_WIDTH: f32 = 10.0;
pub const SIDE_WIDTH: f32 = 3.0;
pub const MAX_DAMAGE: f32 = 100.0;
pub const STAT_GC_Z: f32 = 0.3;

pub fn track() -> StraightTrack {
    StraightTrack::new(TRACK_WIDTH).with_sides(SIDE_WIDTH)
}

/// A car at rest at `(x, y)`, heading down the track
pub fn car_elt(index: usize, x: f32, y: f32) -> CarElt {
    let mut dyn_gc = DynGc::ZERO;
    dyn_gc.pos.lin = Vec3A::new(x, y, STAT_GC_Z);

    CarElt {
        index,
        dyn_gc,
        dyn_gcg: dyn_gc,
        trk_pos: track().global_to_local(Vec2::new(x, y)),
        stat_gc_z: STAT_GC_Z,
        fuel: 50.0,
        tank: 100.0,
        ..Default::default()
    }
}

/// Gives the car a forward speed along +X
pub fn set_speed(elt: &mut CarElt, speed: f32) {
    elt.dyn_gc.vel.lin.x = speed;
    elt.dyn_gcg.vel.lin.x = speed;
    elt.speed = speed.abs();
}

/// What the simulation handed to the collider
#[derive(Debug, Default)]
pub struct CollisionLog {
    /// Participants of every collision pass, in order
    pub passes: Vec<Vec<usize>>,
    pub removed: Vec<usize>,
}

/// A circle collider that records its calls
pub struct RecordingCollider {
    inner: CircleCollider,
    log: Rc<RefCell<CollisionLog>>,
}

impl RecordingCollider {
    pub fn new() -> (Self, Rc<RefCell<CollisionLog>>) {
        let log = Rc::new(RefCell::new(CollisionLog::default()));
        let collider = Self {
            inner: CircleCollider::new(),
            log: log.clone(),
        };
        (collider, log)
    }
}

impl CarCollider for RecordingCollider {
    fn add_car(&mut self, index: usize, dimensions: Vec3A) {
        self.inner.add_car(index, dimensions);
    }

    fn remove_car(&mut self, index: usize) {
        self.log.borrow_mut().removed.push(index);
        self.inner.remove_car(index);
    }

    fn collide(&mut self, bodies: &mut [&mut CarBody], ctx: &StepContext) {
        let participants = bodies.iter().map(|body| body.index).collect();
        self.log.borrow_mut().passes.push(participants);
        self.inner.collide(bodies, ctx);
    }
}

/// Keeps every record it receives
#[derive(Clone, Default)]
pub struct MemoryTelemetry {
    pub records: Rc<RefCell<Vec<(usize, TelemetryRecord)>>>,
}

impl TelemetrySink for MemoryTelemetry {
    fn write_record(&mut self, car: usize, record: &TelemetryRecord) -> io::Result<()> {
        self.records.borrow_mut().push((car, *record));
        Ok(())
    }
}

pub struct Setup {
    pub sim: Simulation,
    pub situation: Situation,
    pub collisions: Rc<RefCell<CollisionLog>>,
}

impl Setup {
    /// A running race on a straight track with basic cars at `elts`
    pub fn new(elts: Vec<CarElt>) -> Self {
        Self::with_models(elts, |_| CarModels::basic(&CarParams::default()))
    }

    pub fn with_models(mut elts: Vec<CarElt>, models: impl Fn(usize) -> CarModels) -> Self {
        // another test may have installed it already
        let _ = racesim::logging::try_init();

        let (collider, collisions) = RecordingCollider::new();
        let mut sim = Simulation::new(
            SimConfig::with_cars(elts.len()),
            Box::new(track()),
            Box::new(collider),
        )
        .unwrap();

        for (i, elt) in elts.iter_mut().enumerate() {
            assert_eq!(sim.add_car(elt, models(i)).unwrap(), i);
        }

        Self {
            sim,
            situation: Situation {
                phase: RacePhase::Running,
                max_damage: MAX_DAMAGE,
                current_time: 0.0,
                cars: elts,
            },
            collisions,
        }
    }

    pub fn tick(&mut self) {
        self.sim.update(&mut self.situation, DT, false).unwrap();
        self.situation.current_time += f64::from(DT);
    }

    /// Ticks until `done` holds for car `index`, returning the number of ticks taken
    pub fn tick_until(&mut self, index: usize, max_ticks: usize, done: impl Fn(&CarElt) -> bool) -> usize {
        for ticks in 1..=max_ticks {
            self.tick();
            if done(&self.situation.cars[index]) {
                return ticks;
            }
        }
        panic!("car {index} did not get there in {max_ticks} ticks: {:?}", self.situation.cars[index].status);
    }

    pub fn car(&self, index: usize) -> &CarElt {
        &self.situation.cars[index]
    }

    pub fn car_mut(&mut self, index: usize) -> &mut CarElt {
        &mut self.situation.cars[index]
    }
}
