use crate::{
    consts::MAX_CARS,
    error::{SimError, SimResult},
};

/// Session-wide simulation settings
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of car slots, at most `MAX_CARS`
    pub num_cars: usize,
    /// Scales fuel consumption
    pub fuel_factor: f32,
    /// Scales damage taken in collisions
    pub damage_factor: f32,
    /// Scales tire wear, 0 turns it off
    pub tire_factor: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SimConfig {
    pub const DEFAULT: Self = Self {
        num_cars: 1,
        fuel_factor: 1.0,
        damage_factor: 1.0,
        tire_factor: 0.0,
    };

    #[must_use]
    pub const fn with_cars(num_cars: usize) -> Self {
        Self {
            num_cars,
            ..Self::DEFAULT
        }
    }

    pub(crate) fn validate(&self) -> SimResult<()> {
        if self.num_cars > MAX_CARS {
            return Err(SimError::TooManyCars {
                requested: self.num_cars,
                capacity: MAX_CARS,
            });
        }
        Ok(())
    }
}
