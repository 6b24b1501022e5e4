/// Where a car is in its withdrawal from the race.
///
/// Stages only ever move forward, one per tick at most.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalStage {
    /// Simulated normally
    #[default]
    Active,
    /// Lifted straight up while rotating towards the parking orientation
    PullUp,
    /// Moved sideways above the parking spot
    PullSide,
    /// Lowered onto the parking spot
    PullDown,
    /// Out of the race for good
    Parked,
}

impl RemovalStage {
    const NAMES: [&'static str; 5] = ["active", "pull-up", "pull-side", "pull-down", "parked"];

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

/// Race conditions of a car, owned by the race manager and read (and partly written) by the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarStatus {
    /// Sitting in its pit box
    pub in_pit: bool,
    /// Passed the finish line, keeps driving at a slow pace
    pub finished: bool,
    /// Taken out of the race by the rules
    pub eliminated: bool,
    /// Retired from the race, the simulation takes it off the track
    pub retired: bool,
    /// Damage went over the limit
    pub broken: bool,
    pub out_of_fuel: bool,
    pub removal: RemovalStage,
}

impl CarStatus {
    /// True if the car must not go through the physics pipeline or the collision pass
    #[must_use]
    pub const fn no_simulation(&self) -> bool {
        self.in_pit || !matches!(self.removal, RemovalStage::Active)
    }

    /// True once the car has been taken out of the race entirely
    #[must_use]
    pub const fn is_out(&self) -> bool {
        matches!(self.removal, RemovalStage::Parked)
    }
}
