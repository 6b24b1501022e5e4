//! Per-tick vehicle dynamics for multi-car racing.
//!
//! A [`Simulation`] owns the physical state of every car and steps them all on
//! each call to [`Simulation::update`]: driver input is sanitized, each car's
//! subsystem models run in a fixed order, contacts between cars are resolved and
//! the results are published into the caller's [`Situation`]. Cars that break
//! down, run dry or get taken out of the race are lifted off the track and parked
//! beside it.

pub use ahash;
pub use glam;

pub mod consts;
pub mod error;
pub mod logging;
pub mod math;
pub mod sim;

pub use error::{SimError, SimResult};
pub use sim::{
    CarElt, CarModels, CarStatus, CircleCollider, CsvTelemetry, RacePhase, RemovalStage,
    SimConfig, Simulation, Situation, StraightTrack,
};
