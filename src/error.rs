use crate::sim::PipelineStage;
use std::io;
use thiserror::Error;

/// Errors surfaced by the simulation.
///
/// Invalid controller input is never an error, it gets corrected in place.
#[derive(Debug, Error)]
pub enum SimError {
    /// A pipeline stage left the car with a non-finite state.
    ///
    /// This is a modeling bug, the tick is abandoned and the simulation should not be stepped again.
    #[error("car {car}: non-finite {field} after the {stage} stage")]
    InvariantViolation {
        car: usize,
        stage: PipelineStage,
        field: &'static str,
    },

    #[error("car table is full ({capacity} slots)")]
    CarTableFull { capacity: usize },

    #[error("car index {index} does not match the next free slot {expected}")]
    CarIndexMismatch { index: usize, expected: usize },

    #[error("no car in slot {index}")]
    UnknownCar { index: usize },

    #[error("{requested} cars requested, at most {capacity} are supported")]
    TooManyCars { requested: usize, capacity: usize },

    #[error("telemetry output: {0}")]
    Io(#[from] io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
