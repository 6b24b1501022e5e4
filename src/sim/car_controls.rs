use crate::{consts::controls as consts, sim::CarStatus};

/// Live driver commands for one car
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarControls {
    /// [0, 1]
    pub accel: f32,
    /// [0, 1]
    pub brake: f32,
    /// [0, 1], 1 means fully disengaged
    pub clutch: f32,
    /// [-1, 1], positive steers left
    pub steer: f32,
    /// -1 is reverse, 0 neutral
    pub gear: i32,
}

impl Default for CarControls {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What the sanitizer needs to know about the car beyond its commands
#[derive(Clone, Copy, Debug)]
pub struct ControlsContext {
    pub status: CarStatus,
    /// Lateral distance from the right edge of the current segment
    pub to_right: f32,
    pub segment_width: f32,
    /// Longitudinal speed in the car frame
    pub speed_x: f32,
}

#[inline]
fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

impl CarControls {
    pub const DEFAULT: Self = Self {
        accel: 0.0,
        brake: 0.0,
        clutch: 0.0,
        steer: 0.0,
        gear: 0,
    };

    /// Clamps every command into its range, replacing NaN and infinity with 0
    #[must_use]
    pub fn clamp(mut self) -> Self {
        self.accel = finite_or_zero(self.accel).clamp(0.0, 1.0);
        self.brake = finite_or_zero(self.brake).clamp(0.0, 1.0);
        self.clutch = finite_or_zero(self.clutch).clamp(0.0, 1.0);
        self.steer = finite_or_zero(self.steer).clamp(-1.0, 1.0);
        self
    }

    /// Applies the race-state overrides, then clamps.
    ///
    /// Broken, eliminated and retired cars get their drive cut and are steered
    /// towards the centerline; finished cars are held to a slow pace.
    #[must_use]
    pub fn sanitize(mut self, ctx: &ControlsContext) -> Self {
        self.accel = finite_or_zero(self.accel);
        self.brake = finite_or_zero(self.brake);
        self.clutch = finite_or_zero(self.clutch);
        self.steer = finite_or_zero(self.steer);

        let status = &ctx.status;
        if status.broken || status.eliminated || status.retired {
            self.accel = 0.0;
            self.brake = consts::BROKEN_BRAKE;
            self.gear = 0;
            self.steer = if ctx.to_right > ctx.segment_width / 2.0 {
                consts::BROKEN_STEER
            } else {
                -consts::BROKEN_STEER
            };
        } else if status.finished {
            self.accel = self.accel.min(consts::FINISH_MAX_ACCEL);
            if ctx.speed_x > consts::FINISH_BRAKE_SPEED {
                self.brake = self.brake.max(consts::FINISH_MIN_BRAKE);
            }
        }

        self.clamp()
    }

    /// Fraction of engine torque the clutch passes through
    #[must_use]
    pub fn clutch_transfer(&self) -> f32 {
        1.0 - self.clutch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ctx(status: CarStatus) -> ControlsContext {
        ControlsContext {
            status,
            to_right: 4.0,
            segment_width: 12.0,
            speed_x: 0.0,
        }
    }

    fn in_range(c: &CarControls) -> bool {
        (0.0..=1.0).contains(&c.accel)
            && (0.0..=1.0).contains(&c.brake)
            && (0.0..=1.0).contains(&c.clutch)
            && (-1.0..=1.0).contains(&c.steer)
    }

    #[test]
    fn non_finite_commands_become_zero() {
        let specials = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY];
        for a in specials {
            for b in specials {
                let raw = CarControls {
                    accel: a,
                    brake: b,
                    clutch: a,
                    steer: b,
                    gear: 2,
                };
                let out = raw.sanitize(&ctx(CarStatus::default()));
                assert_eq!(out.accel, 0.0);
                assert_eq!(out.brake, 0.0);
                assert_eq!(out.clutch, 0.0);
                assert_eq!(out.steer, 0.0);
                assert_eq!(out.gear, 2);
            }
        }
    }

    #[test]
    fn out_of_range_commands_are_clamped() {
        let values = [-7.5, -1.0, -0.3, 0.0, 0.4, 1.0, 1.2, 1e9];
        for &v in &values {
            for &w in &values {
                let raw = CarControls {
                    accel: v,
                    brake: w,
                    clutch: -v,
                    steer: w * 3.0,
                    gear: 1,
                };
                let out = raw.sanitize(&ctx(CarStatus::default()));
                assert!(in_range(&out), "{out:?} from {raw:?}");
            }
        }
    }

    #[test]
    fn broken_car_heads_for_the_centerline() {
        let raw = CarControls {
            accel: 1.0,
            brake: 0.0,
            clutch: 0.0,
            steer: -0.7,
            gear: 4,
        };
        let status = CarStatus {
            broken: true,
            ..Default::default()
        };

        let mut c = ctx(status);
        let out = raw.sanitize(&c);
        assert_eq!(out.accel, 0.0);
        assert_abs_diff_eq!(out.brake, 0.1);
        assert_eq!(out.gear, 0);
        assert_abs_diff_eq!(out.steer, -0.1);

        c.to_right = 8.0;
        let out = raw.sanitize(&c);
        assert_abs_diff_eq!(out.steer, 0.1);
    }

    #[test]
    fn eliminated_car_gets_the_same_override() {
        let status = CarStatus {
            eliminated: true,
            ..Default::default()
        };
        let out = CarControls {
            accel: f32::NAN,
            gear: -1,
            ..Default::default()
        }
        .sanitize(&ctx(status));
        assert_eq!(out.accel, 0.0);
        assert_eq!(out.gear, 0);
        assert_abs_diff_eq!(out.brake, 0.1);
    }

    #[test]
    fn finished_car_keeps_a_slow_pace() {
        let status = CarStatus {
            finished: true,
            ..Default::default()
        };
        let raw = CarControls {
            accel: 0.9,
            brake: 0.0,
            ..Default::default()
        };

        let mut c = ctx(status);
        c.speed_x = 20.0;
        let out = raw.sanitize(&c);
        assert_abs_diff_eq!(out.accel, 0.2);
        assert_eq!(out.brake, 0.0);

        c.speed_x = 45.0;
        let out = raw.sanitize(&c);
        assert_abs_diff_eq!(out.brake, 0.05);

        let harder = CarControls { brake: 0.6, ..raw }.sanitize(&c);
        assert_abs_diff_eq!(harder.brake, 0.6);
    }

    #[test]
    fn clutch_transfer_is_complement() {
        let out = CarControls {
            clutch: 0.25,
            ..Default::default()
        }
        .sanitize(&ctx(CarStatus::default()));
        assert_abs_diff_eq!(out.clutch_transfer(), 0.75);

        let out = CarControls {
            clutch: f32::NAN,
            ..Default::default()
        }
        .sanitize(&ctx(CarStatus::default()));
        assert_abs_diff_eq!(out.clutch_transfer(), 1.0);
    }
}
