use crate::consts::pit::SETUP_RANGE_EPSILON;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TireChange {
    #[default]
    None,
    All,
}

/// What the crew does during a pit stop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitCommand {
    /// Fuel added, ignored unless positive
    pub fuel: f32,
    /// Damage repaired, ignored unless positive
    pub repair: f32,
    pub tire_change: TireChange,
}

/// A car setup value the crew may change in the pits
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitSetupValue {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl PitSetupValue {
    /// Brings `value` back into `[min, max]`.
    ///
    /// Returns false if the range is empty, in which case the value is pinned to `max`
    /// and cannot be adjusted.
    pub fn adjust(&mut self) -> bool {
        if (self.max - self.min).abs() >= SETUP_RANGE_EPSILON {
            self.value = self.value.clamp(self.min.min(self.max), self.max.max(self.min));
            return true;
        }

        self.value = self.max;
        false
    }
}
