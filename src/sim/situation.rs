use crate::sim::CarElt;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RacePhase {
    /// Cars have just been placed in the world, nothing has started yet
    #[default]
    PreSimulation,
    /// Before the green light, engines idle but cars are held in place
    PreStart,
    Running,
    /// The leader has finished, the others complete their lap
    Finishing,
    Ended,
}

impl RacePhase {
    /// True while cars are not allowed to move
    #[must_use]
    pub const fn is_pre_start(self) -> bool {
        matches!(self, Self::PreStart)
    }
}

/// The race as seen by the simulation on one tick
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Situation {
    pub phase: RacePhase,
    /// Damage above which a car is broken, 0 disables the limit
    pub max_damage: f32,
    pub current_time: f64,
    /// One public record per car slot, index `i` belongs to slot `i`
    pub cars: Vec<CarElt>,
}

impl Situation {
    #[must_use]
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }
}
