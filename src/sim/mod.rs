mod car;
mod car_body;
mod car_controls;
mod car_elt;
mod car_status;
mod collide;
mod dyn_gc;
pub mod models;
mod pit;
mod removal;
mod sim_config;
mod simulation;
mod situation;
mod telemetry;
mod track;

pub use car::*;
pub use car_body::*;
pub use car_controls::*;
pub use car_elt::*;
pub use car_status::*;
pub use collide::*;
pub use dyn_gc::*;
pub use models::{CarModels, StepContext};
pub use pit::*;
pub use removal::*;
pub use sim_config::*;
pub use simulation::*;
pub use situation::*;
pub use telemetry::*;
pub use track::*;
