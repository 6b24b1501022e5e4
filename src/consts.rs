/// Hard cap on the number of car slots a simulation can hold
pub const MAX_CARS: usize = 30;

/// Standard gravity (m/s^2)
pub const GRAVITY: f32 = 9.81;

/// Air density at sea level (kg/m^3)
pub const AIR_DENSITY: f32 = 1.225;

/// Atmospheric pressure at sea level (Pa)
pub const SEA_LEVEL_PRESSURE: f32 = 101_325.0;

/// Altitude over which the pressure drops by a factor of e (m)
pub const PRESSURE_SCALE_HEIGHT: f32 = 8434.0;

/// Ambient temperature used for brakes and tires (deg C)
pub const AMBIENT_TEMP: f32 = 20.0;

pub mod removal {
    /// Height above the parking spot the car is lifted to before moving sideways
    pub const PULL_Z_OFFSET: f32 = 3.0;
    /// Transit speed used for every leg of the withdrawal
    pub const PULL_SPEED: f32 = 0.5;
    /// Planar distance (per axis) at which the car counts as above its parking spot
    pub const PARK_TOLERANCE: f32 = 0.5;
    /// A failing car keeps rolling until its longitudinal speed is at most this
    pub const STOP_SPEED: f32 = 1.0;
    /// How far beyond the outermost track edge the car gets parked
    pub const OFF_TRACK_OFFSET: f32 = 3.0;
}

pub mod controls {
    pub const BROKEN_BRAKE: f32 = 0.1;
    /// Magnitude of the steer command that sends a broken car towards the centerline
    pub const BROKEN_STEER: f32 = 0.1;
    pub const FINISH_MAX_ACCEL: f32 = 0.20;
    pub const FINISH_MIN_BRAKE: f32 = 0.05;
    /// Above this longitudinal speed a finished car gets `FINISH_MIN_BRAKE` applied
    pub const FINISH_BRAKE_SPEED: f32 = 30.0;
}

pub mod pit {
    /// Setup parameters whose range is narrower than this are fixed
    pub const SETUP_RANGE_EPSILON: f32 = 0.0001;
}

pub mod collision {
    pub const CAR_RESTITUTION: f32 = 0.3;
    /// Damage per unit of impulse speed exchanged in a car/car contact
    pub const DAMAGE_PER_IMPACT_SPEED: f32 = 10.0;
}
