use std::fmt::Display;

use glam::Vec3A;

/// Six degrees of freedom: a linear part and an angular part.
///
/// `ang` holds roll, pitch and yaw (rotation about X, Y and Z).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dof6 {
    pub lin: Vec3A,
    pub ang: Vec3A,
}

impl Dof6 {
    pub const ZERO: Self = Self {
        lin: Vec3A::ZERO,
        ang: Vec3A::ZERO,
    };

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lin.is_finite() && self.ang.is_finite()
    }
}

/// Dynamic generalized coordinates of the center of gravity
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynGc {
    pub pos: Dof6,
    pub vel: Dof6,
    pub acc: Dof6,
}

impl DynGc {
    pub const ZERO: Self = Self {
        pos: Dof6::ZERO,
        vel: Dof6::ZERO,
        acc: Dof6::ZERO,
    };

    /// Name of the first non-finite component group, if any
    #[must_use]
    pub fn first_non_finite(&self) -> Option<&'static str> {
        if !self.pos.is_finite() {
            Some("position")
        } else if !self.vel.is_finite() {
            Some("velocity")
        } else if !self.acc.is_finite() {
            Some("acceleration")
        } else {
            None
        }
    }

    #[must_use]
    pub fn roll(&self) -> f32 {
        self.pos.ang.x
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pos.ang.y
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.pos.ang.z
    }

    /// Clears velocities and accelerations, keeping the pose
    pub const fn stop(&mut self) {
        self.vel = Dof6::ZERO;
        self.acc = Dof6::ZERO;
    }
}

impl Display for DynGc {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("DynGc {")?;
        f.write_fmt(format_args!("\n\tpos: {} / {}", self.pos.lin, self.pos.ang))?;
        f.write_fmt(format_args!("\n\tvel: {} / {}", self.vel.lin, self.vel.ang))?;
        f.write_fmt(format_args!("\n\tacc: {} / {}", self.acc.lin, self.acc.ang))?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_and_stop() {
        let mut gc = DynGc::ZERO;
        gc.pos.ang = Vec3A::new(0.1, -0.2, 1.5);
        gc.vel.lin = Vec3A::new(20.0, 0.5, 0.0);
        gc.acc.ang = Vec3A::Z;

        assert_eq!((gc.roll(), gc.pitch(), gc.yaw()), (0.1, -0.2, 1.5));

        gc.stop();
        assert_eq!(gc.vel, Dof6::ZERO);
        assert_eq!(gc.acc, Dof6::ZERO);
        assert_eq!(gc.yaw(), 1.5);
        assert_eq!(gc.first_non_finite(), None);
    }
}
